//! 粒子系统
//!
//! 将一份不可变的设置、一个固定容量的粒子池、随机数生成器和模拟时钟组合在一起，
//! 对外提供发射、推进和只读遍历接口。

use super::emitter::spawn_particle;
use super::particle::{Particle, ParticleVertex, ParticleView};
use super::pool::ParticlePool;
use super::settings::{BlendMode, OverflowPolicy, ParticleSettings};
use super::simulator::Simulator;
use crate::core::error::SettingsResult;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 粒子系统统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSystemStats {
    /// 当前存活粒子数
    pub alive_count: usize,
    /// 总发射数
    pub total_emitted: u64,
    /// 因粒子池饱和被丢弃的发射请求数
    pub total_dropped: u64,
    /// 总过期数
    pub total_retired: u64,
    /// 覆盖最早粒子的次数
    pub total_recycled: u64,
}

/// 粒子系统
#[derive(Debug)]
pub struct ParticleSystem {
    settings: ParticleSettings,
    pool: ParticlePool,
    simulator: Simulator,
    rng: StdRng,
    stats: ParticleSystemStats,
}

impl ParticleSystem {
    /// 创建粒子系统，随机种子取自系统熵源
    ///
    /// # 错误
    ///
    /// 设置未通过校验时返回 `SettingsError`。
    pub fn new(settings: ParticleSettings) -> SettingsResult<Self> {
        settings.validate()?;
        Ok(Self::from_validated(settings, StdRng::from_entropy()))
    }

    /// 使用固定种子创建粒子系统（可复现）
    pub fn with_seed(settings: ParticleSettings, seed: u64) -> SettingsResult<Self> {
        settings.validate()?;
        Ok(Self::from_validated(settings, StdRng::seed_from_u64(seed)))
    }

    /// 由已校验的设置构造
    pub(crate) fn from_validated(settings: ParticleSettings, rng: StdRng) -> Self {
        tracing::debug!(
            target: "particles",
            "Creating particle system: capacity={}, blend={:?}, acceleration={:?}",
            settings.max_particles,
            settings.blend_mode,
            settings.acceleration
        );

        Self {
            pool: ParticlePool::new(settings.max_particles),
            settings,
            simulator: Simulator::new(),
            rng,
            stats: ParticleSystemStats::default(),
        }
    }

    /// 发射粒子
    ///
    /// 粒子池饱和时，按 `OverflowPolicy` 丢弃剩余请求或覆盖最早的粒子。
    /// 从不报错或阻塞，返回实际发射数量。
    pub fn spawn(&mut self, position: Vec3, velocity: Vec3, count: usize) -> usize {
        let now = self.simulator.current_time();
        let mut emitted = 0;

        for _ in 0..count {
            let index = match self.pool.claim() {
                Some(index) => index,
                None => match self.settings.overflow {
                    OverflowPolicy::DropNew => break,
                    OverflowPolicy::RecycleOldest => match self.pool.recycle_oldest() {
                        Some(index) => {
                            self.stats.total_recycled += 1;
                            index
                        }
                        None => break,
                    },
                },
            };

            let particle = spawn_particle(&self.settings, &mut self.rng, position, velocity, now);
            if let Some(slot) = self.pool.get_mut(index) {
                *slot = particle;
            }
            emitted += 1;
        }

        let dropped = count - emitted;
        if dropped > 0 {
            tracing::trace!(
                target: "particles",
                "Particle pool saturated, dropped {} of {} spawn requests",
                dropped,
                count
            );
        }

        self.stats.total_emitted += emitted as u64;
        self.stats.total_dropped += dropped as u64;
        self.stats.alive_count = self.pool.live_count();
        emitted
    }

    /// 推进模拟
    pub fn advance(&mut self, delta_time: f32) {
        let retired = self.simulator.advance(&mut self.pool, delta_time);
        self.stats.total_retired += retired as u64;
        self.stats.alive_count = self.pool.live_count();
    }

    /// 遍历存活粒子的只读视图（按槽位顺序）
    pub fn iter_live(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.pool.iter_live().map(Particle::view)
    }

    /// 遍历存活粒子的原始记录
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.pool.iter_live()
    }

    /// 将存活粒子写入顶点缓冲
    ///
    /// 复用调用方的缓冲区，容量足够时不会分配。
    pub fn write_vertices(&self, out: &mut Vec<ParticleVertex>) {
        out.clear();
        out.extend(self.iter_live().map(|view| view.to_vertex()));
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.settings.blend_mode
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// 当前模拟时间（秒）
    pub fn current_time(&self) -> f32 {
        self.simulator.current_time()
    }

    pub fn stats(&self) -> ParticleSystemStats {
        self.stats
    }

    /// 清空所有粒子并重置统计，模拟时钟保持不变
    pub fn clear(&mut self) {
        self.pool.clear();
        self.stats = ParticleSystemStats::default();
    }
}
