use crate::config::{LogLevel, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// 初始化日志系统
///
/// 配置tracing日志框架。`RUST_LOG`环境变量优先，否则使用配置中的日志级别。
/// 重复调用是安全的，后续调用会被忽略。
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init();

    tracing::debug!(target: "engine", "Logging initialized at {:?}", config.level);
}

impl LogLevel {
    /// 转换为EnvFilter指令
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_names() {
        assert_eq!(LogLevel::Trace.as_filter(), "trace");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }

    #[test]
    fn test_init_logging_twice() {
        let config = LoggingConfig::default();
        init_logging(&config);
        init_logging(&config);
    }
}
