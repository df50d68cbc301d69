//! 粒子设置
//!
//! 纯数据的粒子系统配置：生成范围、生命周期、大小/颜色插值、加速度模式和混合模式。
//! 设置在构造粒子系统时校验一次，之后不可变。

use crate::core::error::{ParticleResult, SettingsError, SettingsResult};
use glam::{Vec3, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

// ============================================================================
// 数值范围
// ============================================================================

/// 可用作生成范围端点的数值类型
pub trait RangeValue: Copy + PartialEq + Debug {
    /// 在 [min, max] 内均匀采样（向量按分量独立采样）
    fn sample<R: Rng + ?Sized>(min: Self, max: Self, rng: &mut R) -> Self;

    /// 线性插值
    fn lerp_value(self, other: Self, t: f32) -> Self;

    /// 校验 min <= max 且所有分量有限
    fn check(field: &str, min: Self, max: Self) -> SettingsResult<()>;
}

fn check_scalar(field: &str, min: f32, max: f32) -> SettingsResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(SettingsError::NonFinite {
            field: field.to_string(),
        });
    }
    if min > max {
        return Err(SettingsError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn sample_scalar<R: Rng + ?Sized>(min: f32, max: f32, rng: &mut R) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

impl RangeValue for f32 {
    fn sample<R: Rng + ?Sized>(min: Self, max: Self, rng: &mut R) -> Self {
        sample_scalar(min, max, rng)
    }

    fn lerp_value(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn check(field: &str, min: Self, max: Self) -> SettingsResult<()> {
        check_scalar(field, min, max)
    }
}

impl RangeValue for Vec3 {
    fn sample<R: Rng + ?Sized>(min: Self, max: Self, rng: &mut R) -> Self {
        Vec3::new(
            sample_scalar(min.x, max.x, rng),
            sample_scalar(min.y, max.y, rng),
            sample_scalar(min.z, max.z, rng),
        )
    }

    fn lerp_value(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }

    fn check(field: &str, min: Self, max: Self) -> SettingsResult<()> {
        for (axis, (lo, hi)) in ["x", "y", "z"]
            .iter()
            .zip(min.to_array().into_iter().zip(max.to_array()))
        {
            check_scalar(&format!("{field}.{axis}"), lo, hi)?;
        }
        Ok(())
    }
}

impl RangeValue for Vec4 {
    fn sample<R: Rng + ?Sized>(min: Self, max: Self, rng: &mut R) -> Self {
        Vec4::new(
            sample_scalar(min.x, max.x, rng),
            sample_scalar(min.y, max.y, rng),
            sample_scalar(min.z, max.z, rng),
            sample_scalar(min.w, max.w, rng),
        )
    }

    fn lerp_value(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }

    fn check(field: &str, min: Self, max: Self) -> SettingsResult<()> {
        for (channel, (lo, hi)) in ["r", "g", "b", "a"]
            .iter()
            .zip(min.to_array().into_iter().zip(max.to_array()))
        {
            check_scalar(&format!("{field}.{channel}"), lo, hi)?;
        }
        Ok(())
    }
}

/// 闭区间生成范围 [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}

/// 标量范围
pub type FloatRange = SpawnRange<f32>;
/// 向量范围
pub type Vec3Range = SpawnRange<Vec3>;
/// 颜色范围（RGBA）
pub type ColorRange = SpawnRange<Vec4>;

impl<T: RangeValue> SpawnRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// 固定值范围
    pub fn constant(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// 随机采样
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        T::sample(self.min, self.max, rng)
    }

    /// 以 t（0-1）在 min 与 max 之间插值
    pub fn lerp(&self, t: f32) -> T {
        self.min.lerp_value(self.max, t)
    }

    pub fn validate(&self, field: &str) -> SettingsResult<()> {
        T::check(field, self.min, self.max)
    }
}

// ============================================================================
// 模式枚举
// ============================================================================

/// 加速度模式
///
/// 决定每个粒子的加速度如何得出，在发射时计算一次。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AccelerationMode {
    /// 无加速度，匀速运动
    None,
    /// 沿初始速度方向的随机标量加速度
    Scalar { range: FloatRange },
    /// 按分量随机的加速度向量（例如重力）
    Vector { range: Vec3Range },
    /// 由 `v_end = v0 + a·t` 解出，t 为粒子生命周期，`v_end = end_velocity × v0`
    EndVelocity { end_velocity: f32 },
}

impl Default for AccelerationMode {
    fn default() -> Self {
        Self::None
    }
}

impl AccelerationMode {
    fn validate(&self) -> SettingsResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Scalar { range } => range.validate("acceleration.range"),
            Self::Vector { range } => range.validate("acceleration.range"),
            Self::EndVelocity { end_velocity } => {
                if end_velocity.is_finite() {
                    Ok(())
                } else {
                    Err(SettingsError::NonFinite {
                        field: "acceleration.end_velocity".to_string(),
                    })
                }
            }
        }
    }
}

/// 混合模式（转交给渲染器）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
}

/// 粒子池饱和时的发射策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// 丢弃新的发射请求
    #[default]
    DropNew,
    /// 覆盖最早发射的存活粒子
    RecycleOldest,
}

// ============================================================================
// 粒子设置
// ============================================================================

/// 粒子系统设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// 粒子池容量
    pub max_particles: usize,
    /// 粒子生命周期范围（秒）
    pub lifetime: FloatRange,
    /// 初始速度大小范围
    pub initial_speed: FloatRange,
    /// 随机方向（按分量采样后归一化）
    pub direction: Vec3Range,
    /// 继承发射者速度的比例
    pub emitter_velocity_sensitivity: f32,
    /// 加速度模式
    pub acceleration: AccelerationMode,
    /// 初始旋转范围（弧度）
    pub rotation: FloatRange,
    /// 旋转速度范围（弧度/秒）
    pub rotation_speed: FloatRange,
    /// 初始大小范围
    pub start_size: FloatRange,
    /// 结束大小范围
    pub end_size: FloatRange,
    /// 初始颜色范围
    pub start_color: ColorRange,
    /// 结束颜色范围
    pub end_color: ColorRange,
    /// 混合模式
    pub blend_mode: BlendMode,
    /// 饱和策略
    pub overflow: OverflowPolicy,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            max_particles: 1000,
            lifetime: FloatRange::new(1.0, 2.0),
            initial_speed: FloatRange::new(1.0, 2.0),
            direction: Vec3Range::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            emitter_velocity_sensitivity: 1.0,
            acceleration: AccelerationMode::None,
            rotation: FloatRange::constant(0.0),
            rotation_speed: FloatRange::constant(0.0),
            start_size: FloatRange::constant(1.0),
            end_size: FloatRange::constant(1.0),
            start_color: ColorRange::constant(Vec4::ONE),
            end_color: ColorRange::constant(Vec4::ONE),
            blend_mode: BlendMode::Alpha,
            overflow: OverflowPolicy::DropNew,
        }
    }
}

impl ParticleSettings {
    pub fn new(max_particles: usize) -> Self {
        Self {
            max_particles,
            ..Default::default()
        }
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.lifetime = FloatRange::new(min, max);
        self
    }

    /// 设置初始速度
    pub fn with_initial_speed(mut self, min: f32, max: f32) -> Self {
        self.initial_speed = FloatRange::new(min, max);
        self
    }

    /// 设置随机方向范围
    pub fn with_direction(mut self, min: Vec3, max: Vec3) -> Self {
        self.direction = Vec3Range::new(min, max);
        self
    }

    /// 设置加速度模式
    pub fn with_acceleration(mut self, acceleration: AccelerationMode) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// 设置旋转速度
    pub fn with_rotation_speed(mut self, min: f32, max: f32) -> Self {
        self.rotation_speed = FloatRange::new(min, max);
        self
    }

    /// 设置大小
    pub fn with_sizes(mut self, start: FloatRange, end: FloatRange) -> Self {
        self.start_size = start;
        self.end_size = end;
        self
    }

    /// 设置颜色
    pub fn with_colors(mut self, start: ColorRange, end: ColorRange) -> Self {
        self.start_color = start;
        self.end_color = end;
        self
    }

    /// 设置混合模式
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// 设置饱和策略
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// 验证设置
    pub fn validate(&self) -> SettingsResult<()> {
        if self.max_particles == 0 {
            return Err(SettingsError::invalid_value(
                "max_particles",
                "capacity must be greater than zero",
            ));
        }
        if u32::try_from(self.max_particles).is_err() {
            return Err(SettingsError::invalid_value(
                "max_particles",
                "capacity must fit in u32",
            ));
        }

        self.lifetime.validate("lifetime")?;
        if self.lifetime.min <= 0.0 {
            return Err(SettingsError::invalid_value(
                "lifetime",
                format!("minimum lifetime must be positive, got {}", self.lifetime.min),
            ));
        }

        self.initial_speed.validate("initial_speed")?;
        self.direction.validate("direction")?;
        if !self.emitter_velocity_sensitivity.is_finite() {
            return Err(SettingsError::NonFinite {
                field: "emitter_velocity_sensitivity".to_string(),
            });
        }
        self.acceleration.validate()?;
        self.rotation.validate("rotation")?;
        self.rotation_speed.validate("rotation_speed")?;

        self.start_size.validate("start_size")?;
        self.end_size.validate("end_size")?;
        if self.start_size.min < 0.0 || self.end_size.min < 0.0 {
            return Err(SettingsError::invalid_value(
                "size",
                "particle sizes must not be negative",
            ));
        }

        self.start_color.validate("start_color")?;
        self.end_color.validate("end_color")?;
        Ok(())
    }

    /// 从TOML字符串加载并验证设置
    pub fn from_toml_str(content: &str) -> ParticleResult<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| crate::config::ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// 从JSON字符串加载并验证设置
    pub fn from_json_str(content: &str) -> ParticleResult<Self> {
        let settings: Self = serde_json::from_str(content)
            .map_err(|e| crate::config::ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_settings_valid() {
        assert!(ParticleSettings::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let settings = ParticleSettings::default().with_initial_speed(5.0, 1.0);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidRange {
                field: "initial_speed".to_string(),
                min: 5.0,
                max: 1.0,
            })
        );
    }

    #[test]
    fn test_inverted_vector_component_named() {
        let settings = ParticleSettings::default()
            .with_direction(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        match settings.validate() {
            Err(SettingsError::InvalidRange { field, .. }) => assert_eq!(field, "direction.y"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_inverted_color_channel_named() {
        let settings = ParticleSettings::default().with_colors(
            ColorRange::new(Vec4::new(1.0, 1.0, 1.0, 1.0), Vec4::new(1.0, 1.0, 1.0, 0.5)),
            ColorRange::constant(Vec4::ONE),
        );
        match settings.validate() {
            Err(SettingsError::InvalidRange { field, .. }) => assert_eq!(field, "start_color.a"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let settings = ParticleSettings::new(0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let settings = ParticleSettings::default().with_lifetime(0.0, 1.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let settings = ParticleSettings::default().with_acceleration(
            AccelerationMode::EndVelocity {
                end_velocity: f32::NAN,
            },
        );
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_range_sample_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = FloatRange::new(2.0, 3.0);
        for _ in 0..100 {
            let v = range.sample(&mut rng);
            assert!((2.0..=3.0).contains(&v));
        }
        assert_eq!(FloatRange::constant(4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn test_range_lerp() {
        let range = FloatRange::new(10.0, 20.0);
        assert!((range.lerp(0.5) - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_toml_partial_settings() {
        let settings = ParticleSettings::from_toml_str(
            r#"
            max_particles = 50
            blend_mode = "Additive"

            [lifetime]
            min = 0.5
            max = 1.5

            [acceleration]
            mode = "EndVelocity"
            end_velocity = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(settings.max_particles, 50);
        assert_eq!(settings.blend_mode, BlendMode::Additive);
        assert_eq!(
            settings.acceleration,
            AccelerationMode::EndVelocity { end_velocity: 0.25 }
        );
        assert_eq!(settings.overflow, OverflowPolicy::DropNew);
    }

    #[test]
    fn test_toml_invalid_range_fails_at_load() {
        let result = ParticleSettings::from_toml_str(
            r#"
            [lifetime]
            min = 3.0
            max = 1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = ParticleSettings::default().with_acceleration(AccelerationMode::Vector {
            range: Vec3Range::constant(Vec3::new(0.0, -9.81, 0.0)),
        });
        let json = serde_json::to_string(&settings).unwrap();
        let parsed = ParticleSettings::from_json_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
