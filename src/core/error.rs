//! 统一错误处理模块
//!
//! 提供粒子引擎范围内的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置层错误** (`config::ConfigError`): 配置文件读取、解析和校验错误
//! - **设置层错误** (`core::error::SettingsError`): 粒子设置的范围/数值校验错误
//!
//! `ParticleError` 可以同时承载上述两类错误。容量耗尽不属于错误，
//! 发射请求会被静默丢弃并计入统计。

use crate::config::ConfigError;
use thiserror::Error;

/// 粒子引擎顶层错误类型
#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 粒子设置校验错误
///
/// 在构造粒子系统时一次性检测，不会出现在每帧更新路径中。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Invalid range for {field}: min {min} > max {max}")]
    InvalidRange { field: String, min: f32, max: f32 },

    #[error("Non-finite value in {field}")]
    NonFinite { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl SettingsError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type SettingsResult<T> = Result<T, SettingsError>;
