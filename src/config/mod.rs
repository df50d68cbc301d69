/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和加载时校验
use crate::core::error::SettingsError;
use crate::impl_default;
use crate::particles::{ParticleEffect, ParticleSettings};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
    /// 效果设置错误
    #[error("Invalid settings for effect {effect}: {source}")]
    Settings {
        effect: String,
        #[source]
        source: SettingsError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 引擎主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 模拟配置
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 效果覆盖（未列出的效果使用预设）
    #[serde(default)]
    pub effects: Vec<EffectConfig>,
}

impl EngineConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 按扩展名加载配置文件（`.json` 使用JSON，其余按TOML解析）
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// 从任意键值来源覆盖配置，键名与环境变量相同
    ///
    /// 无法解析的值被忽略。
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dt) = lookup("PARTICLES_FIXED_TIMESTEP").and_then(|v| v.parse().ok()) {
            self.simulation.fixed_timestep = dt;
        }
        if let Some(steps) = lookup("PARTICLES_MAX_STEPS").and_then(|v| v.parse().ok()) {
            self.simulation.max_steps_per_frame = steps;
        }
        if let Some(seed) = lookup("PARTICLES_SEED").and_then(|v| v.parse().ok()) {
            self.simulation.seed = Some(seed);
        }
        if let Some(level) = lookup("PARTICLES_LOG_LEVEL").and_then(|v| LogLevel::from_name(&v)) {
            self.logging.level = level;
        }
    }

    /// 解析某个效果最终使用的设置
    ///
    /// 同一效果出现多次时，后面的覆盖生效。
    pub fn settings_for(&self, effect: ParticleEffect) -> ParticleSettings {
        match self.effects.iter().rev().find(|e| e.effect == effect) {
            Some(override_config) => {
                let mut settings = override_config
                    .settings
                    .clone()
                    .unwrap_or_else(|| effect.settings());
                if let Some(capacity) = override_config.capacity {
                    settings.max_particles = capacity;
                }
                settings
            }
            None => effect.settings(),
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.simulation.validate()?;
        for effect in ParticleEffect::ALL {
            self.settings_for(effect)
                .validate()
                .map_err(|source| ConfigError::Settings {
                    effect: effect.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./particles.toml
    /// 2. ./particles.json
    /// 3. ~/.config/particle_engine/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("particles.toml") {
            tracing::info!(target: "config", "Loaded config from particles.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("particles.json") {
            tracing::info!(target: "config", "Loaded config from particles.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("particle_engine")
                .join("config.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "config", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "config", "Using default configuration");
        Self::default()
    }
}

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 固定步长（秒）
    pub fixed_timestep: f32,

    /// 单帧最大步数
    pub max_steps_per_frame: u32,

    /// 随机种子（None 表示使用系统熵源）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl_default!(SimulationConfig {
    fixed_timestep: 1.0 / 60.0,
    max_steps_per_frame: 8,
    seed: None,
});

impl SimulationConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid fixed timestep: {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::ValidationError(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 单个效果的覆盖配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    /// 效果类型
    pub effect: ParticleEffect,

    /// 覆盖粒子池容量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,

    /// 完整替换预设设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ParticleSettings>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出日志目标
    pub with_target: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    with_target: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 按名称解析（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.effects.is_empty());
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = EngineConfig::default();
        config.simulation.seed = Some(7);
        config.effects.push(EffectConfig {
            effect: ParticleEffect::Fire,
            capacity: Some(64),
            settings: None,
        });

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.simulation.seed, Some(7));
        assert_eq!(parsed.effects.len(), 1);
        assert_eq!(parsed.settings_for(ParticleEffect::Fire).max_particles, 64);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [simulation]
            max_steps_per_frame = 4

            [logging]
            level = "Debug"

            [[effects]]
            effect = "Smoke"
            capacity = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.max_steps_per_frame, 4);
        assert!((config.simulation.fixed_timestep - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.settings_for(ParticleEffect::Smoke).max_particles, 32);
        assert_eq!(
            config.settings_for(ParticleEffect::Fire),
            ParticleEffect::Fire.settings()
        );
    }

    #[test]
    fn test_settings_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[effects]]
            effect = "Explosion"

            [effects.settings]
            max_particles = 10

            [effects.settings.lifetime]
            min = 0.25
            max = 0.5
            "#,
        )
        .unwrap();

        let settings = config.settings_for(ParticleEffect::Explosion);
        assert_eq!(settings.max_particles, 10);
        assert_eq!(settings.lifetime.max, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_effect_names_effect() {
        let mut config = EngineConfig::default();
        config.effects.push(EffectConfig {
            effect: ParticleEffect::RockDebris,
            capacity: Some(0),
            settings: None,
        });

        match config.validate() {
            Err(ConfigError::Settings { effect, .. }) => assert_eq!(effect, "RockDebris"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_timestep() {
        let mut config = EngineConfig::default();
        config.simulation.fixed_timestep = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EngineConfig::default();
        config.effects.push(EffectConfig {
            effect: ParticleEffect::ProjectileTrail,
            capacity: None,
            settings: Some(ParticleEffect::ProjectileTrail.settings()),
        });
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(
            parsed.settings_for(ParticleEffect::ProjectileTrail),
            ParticleEffect::ProjectileTrail.settings()
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PARTICLES_SEED", "1234"),
            ("PARTICLES_LOG_LEVEL", "warn"),
            ("PARTICLES_MAX_STEPS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.simulation.seed, Some(1234));
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.simulation.max_steps_per_frame, 8);
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.simulation.seed = Some(5);

        let json_path = dir.path().join("particles.JSON");
        config.save_json(&json_path).unwrap();
        assert_eq!(EngineConfig::from_file(&json_path).unwrap().simulation.seed, Some(5));

        let toml_path = dir.path().join("particles.toml");
        config.save_toml(&toml_path).unwrap();
        assert_eq!(EngineConfig::from_file(&toml_path).unwrap().simulation.seed, Some(5));

        assert!(matches!(
            EngineConfig::from_toml_file(&json_path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::from_name("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("verbose"), None);
    }
}
