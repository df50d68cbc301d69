//! 粒子系统管理器
//!
//! 为每种 `ParticleEffect` 持有一个粒子系统，存放在以效果索引为下标的固定数组中，
//! 并以固定步长驱动所有系统。

use super::clock::SimulationClock;
use super::effects::ParticleEffect;
use super::system::ParticleSystem;
use crate::config::{ConfigResult, EngineConfig};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 粒子系统管理器
#[derive(Debug)]
pub struct ParticleManager {
    systems: [ParticleSystem; ParticleEffect::COUNT],
    clock: SimulationClock,
}

impl ParticleManager {
    /// 根据配置创建管理器
    ///
    /// 所有效果的设置在这里一次性解析并校验。
    ///
    /// # 错误
    ///
    /// 模拟配置或任一效果设置无效时返回 `ConfigError`。
    pub fn new(config: &EngineConfig) -> ConfigResult<Self> {
        config.validate()?;

        let seed = config.simulation.seed;
        let mut next_index = 0u64;
        let systems = ParticleEffect::ALL.map(|effect| {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(next_index)),
                None => StdRng::from_entropy(),
            };
            next_index += 1;
            ParticleSystem::from_validated(config.settings_for(effect), rng)
        });

        tracing::info!(
            target: "particles",
            "Particle manager ready: {} effects, {} particle slots",
            ParticleEffect::COUNT,
            systems.iter().map(ParticleSystem::capacity).sum::<usize>()
        );

        Ok(Self {
            systems,
            clock: SimulationClock::new(
                config.simulation.fixed_timestep,
                config.simulation.max_steps_per_frame,
            ),
        })
    }

    /// 使用全部预设创建管理器
    pub fn with_presets() -> ConfigResult<Self> {
        Self::new(&EngineConfig::default())
    }

    pub fn system(&self, effect: ParticleEffect) -> &ParticleSystem {
        &self.systems[effect.index()]
    }

    pub fn system_mut(&mut self, effect: ParticleEffect) -> &mut ParticleSystem {
        &mut self.systems[effect.index()]
    }

    /// 在指定效果中发射粒子，返回实际发射数量
    pub fn spawn(
        &mut self,
        effect: ParticleEffect,
        position: Vec3,
        velocity: Vec3,
        count: usize,
    ) -> usize {
        self.system_mut(effect).spawn(position, velocity, count)
    }

    /// 以任意时间增量推进所有系统
    pub fn advance(&mut self, delta_time: f32) {
        for system in &mut self.systems {
            system.advance(delta_time);
        }
    }

    /// 按固定步长推进所有系统，返回本帧执行的步数
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let steps = self.clock.consume_steps(frame_dt);
        let dt = self.clock.fixed_dt();
        for _ in 0..steps {
            self.advance(dt);
        }
        steps
    }

    /// 所有系统的存活粒子总数
    pub fn total_live(&self) -> usize {
        self.systems.iter().map(ParticleSystem::live_count).sum()
    }

    /// 遍历所有效果及其系统
    pub fn iter(&self) -> impl Iterator<Item = (ParticleEffect, &ParticleSystem)> + '_ {
        ParticleEffect::ALL.into_iter().zip(self.systems.iter())
    }

    /// 清空所有系统
    pub fn clear(&mut self) {
        for system in &mut self.systems {
            system.clear();
        }
    }
}
