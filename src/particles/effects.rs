//! 粒子效果预设
//!
//! 以枚举标签索引的固定预设表。管理器在初始化时按 `index()` 一次性解析，
//! 运行时不做字符串查找。

use super::settings::{
    AccelerationMode, BlendMode, ColorRange, FloatRange, OverflowPolicy, ParticleSettings,
    Vec3Range,
};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI};

/// 粒子效果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleEffect {
    /// 爆炸火光
    Explosion,
    /// 爆炸烟雾
    ExplosionSmoke,
    /// 火焰
    Fire,
    /// 烟柱
    Smoke,
    /// 投射物拖尾
    ProjectileTrail,
    /// 岩石碎屑（平面，z = 0）
    RockDebris,
}

impl ParticleEffect {
    pub const COUNT: usize = 6;

    /// 按索引顺序排列的全部效果
    pub const ALL: [ParticleEffect; Self::COUNT] = [
        ParticleEffect::Explosion,
        ParticleEffect::ExplosionSmoke,
        ParticleEffect::Fire,
        ParticleEffect::Smoke,
        ParticleEffect::ProjectileTrail,
        ParticleEffect::RockDebris,
    ];

    /// 在固定表中的索引
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParticleEffect::Explosion => "Explosion",
            ParticleEffect::ExplosionSmoke => "ExplosionSmoke",
            ParticleEffect::Fire => "Fire",
            ParticleEffect::Smoke => "Smoke",
            ParticleEffect::ProjectileTrail => "ProjectileTrail",
            ParticleEffect::RockDebris => "RockDebris",
        }
    }

    /// 预设设置
    pub fn settings(&self) -> ParticleSettings {
        match self {
            ParticleEffect::Explosion => ParticleSettings {
                max_particles: 100,
                lifetime: FloatRange::new(1.0, 2.0),
                initial_speed: FloatRange::new(20.0, 30.0),
                direction: Vec3Range::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
                emitter_velocity_sensitivity: 1.0,
                acceleration: AccelerationMode::EndVelocity { end_velocity: 0.0 },
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::new(-1.0, 1.0),
                start_size: FloatRange::constant(10.0),
                end_size: FloatRange::new(100.0, 200.0),
                start_color: ColorRange::new(
                    Vec4::new(0.5, 0.5, 0.5, 1.0),
                    Vec4::new(0.66, 0.66, 0.66, 1.0),
                ),
                end_color: ColorRange::new(
                    Vec4::new(0.5, 0.5, 0.5, 0.0),
                    Vec4::new(0.66, 0.66, 0.66, 0.0),
                ),
                blend_mode: BlendMode::Additive,
                overflow: OverflowPolicy::DropNew,
            },
            ParticleEffect::ExplosionSmoke => ParticleSettings {
                max_particles: 200,
                lifetime: FloatRange::new(2.0, 4.0),
                initial_speed: FloatRange::new(0.0, 50.0),
                direction: Vec3Range::new(Vec3::new(-1.0, -0.2, -1.0), Vec3::splat(1.0)),
                emitter_velocity_sensitivity: 1.0,
                acceleration: AccelerationMode::Vector {
                    range: Vec3Range::constant(Vec3::new(0.0, -20.0, 0.0)),
                },
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::new(-2.0, 2.0),
                start_size: FloatRange::constant(10.0),
                end_size: FloatRange::new(100.0, 200.0),
                start_color: ColorRange::new(Vec4::new(0.83, 0.83, 0.83, 1.0), Vec4::ONE),
                end_color: ColorRange::new(
                    Vec4::new(0.83, 0.83, 0.83, 0.0),
                    Vec4::new(1.0, 1.0, 1.0, 0.0),
                ),
                blend_mode: BlendMode::Alpha,
                overflow: OverflowPolicy::DropNew,
            },
            ParticleEffect::Fire => ParticleSettings {
                max_particles: 2400,
                lifetime: FloatRange::new(1.0, 2.0),
                initial_speed: FloatRange::new(0.0, 15.0),
                direction: Vec3Range::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
                emitter_velocity_sensitivity: 1.0,
                acceleration: AccelerationMode::Vector {
                    range: Vec3Range::constant(Vec3::new(0.0, 15.0, 0.0)),
                },
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::constant(0.0),
                start_size: FloatRange::new(5.0, 10.0),
                end_size: FloatRange::new(10.0, 40.0),
                start_color: ColorRange::new(
                    Vec4::new(1.0, 1.0, 1.0, 0.04),
                    Vec4::new(1.0, 1.0, 1.0, 0.16),
                ),
                end_color: ColorRange::constant(Vec4::new(1.0, 1.0, 1.0, 0.0)),
                blend_mode: BlendMode::Additive,
                overflow: OverflowPolicy::DropNew,
            },
            ParticleEffect::Smoke => ParticleSettings {
                max_particles: 600,
                lifetime: FloatRange::constant(10.0),
                initial_speed: FloatRange::new(10.0, 20.0),
                direction: Vec3Range::new(Vec3::new(-1.0, 0.5, -1.0), Vec3::splat(1.0)),
                emitter_velocity_sensitivity: 1.0,
                acceleration: AccelerationMode::EndVelocity { end_velocity: 0.75 },
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::new(-1.0, 1.0),
                start_size: FloatRange::new(4.0, 7.0),
                end_size: FloatRange::new(35.0, 140.0),
                start_color: ColorRange::new(Vec4::new(0.6, 0.6, 0.6, 1.0), Vec4::ONE),
                end_color: ColorRange::new(
                    Vec4::new(0.6, 0.6, 0.6, 0.0),
                    Vec4::new(1.0, 1.0, 1.0, 0.0),
                ),
                blend_mode: BlendMode::Alpha,
                overflow: OverflowPolicy::RecycleOldest,
            },
            ParticleEffect::ProjectileTrail => ParticleSettings {
                max_particles: 1000,
                lifetime: FloatRange::new(1.2, 3.0),
                initial_speed: FloatRange::new(0.0, 1.0),
                direction: Vec3Range::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
                emitter_velocity_sensitivity: 0.1,
                acceleration: AccelerationMode::None,
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::new(-4.0, 4.0),
                start_size: FloatRange::new(1.0, 3.0),
                end_size: FloatRange::new(4.0, 11.0),
                start_color: ColorRange::new(
                    Vec4::new(0.25, 0.38, 0.5, 1.0),
                    Vec4::new(1.0, 1.0, 1.0, 1.0),
                ),
                end_color: ColorRange::new(
                    Vec4::new(0.25, 0.38, 0.5, 0.0),
                    Vec4::new(1.0, 1.0, 1.0, 0.0),
                ),
                blend_mode: BlendMode::Alpha,
                overflow: OverflowPolicy::RecycleOldest,
            },
            ParticleEffect::RockDebris => ParticleSettings {
                max_particles: 200,
                lifetime: FloatRange::new(0.5, 1.0),
                initial_speed: FloatRange::new(60.0, 120.0),
                direction: Vec3Range::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)),
                emitter_velocity_sensitivity: 1.0,
                acceleration: AccelerationMode::Scalar {
                    range: FloatRange::new(-60.0, -30.0),
                },
                rotation: FloatRange::new(-PI, PI),
                rotation_speed: FloatRange::new(-FRAC_PI_4, FRAC_PI_4),
                start_size: FloatRange::new(0.3, 1.0),
                end_size: FloatRange::new(0.3, 1.0),
                start_color: ColorRange::constant(Vec4::ONE),
                end_color: ColorRange::constant(Vec4::new(1.0, 1.0, 1.0, 0.0)),
                blend_mode: BlendMode::Alpha,
                overflow: OverflowPolicy::DropNew,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_valid() {
        for effect in ParticleEffect::ALL {
            assert!(
                effect.settings().validate().is_ok(),
                "{} preset is invalid",
                effect.name()
            );
        }
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, effect) in ParticleEffect::ALL.iter().enumerate() {
            assert_eq!(effect.index(), i);
        }
    }

    #[test]
    fn test_rock_debris_is_planar() {
        let settings = ParticleEffect::RockDebris.settings();
        assert_eq!(settings.direction.min.z, 0.0);
        assert_eq!(settings.direction.max.z, 0.0);
    }
}
