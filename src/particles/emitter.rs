//! 粒子发射
//!
//! 从设置中采样每个粒子的初始状态，以及沿移动路径按速率发射的拖尾发射器。

use super::particle::Particle;
use super::settings::ParticleSettings;
use super::simulator::derive_acceleration;
use super::system::ParticleSystem;
use crate::core::error::{SettingsError, SettingsResult};
use glam::{Vec3, Vec4};
use rand::Rng;

/// 采样一个新粒子
///
/// 初始速度 = 发射者速度 × 继承比例 + 随机方向 × 随机速度。
pub(crate) fn spawn_particle<R: Rng + ?Sized>(
    settings: &ParticleSettings,
    rng: &mut R,
    position: Vec3,
    base_velocity: Vec3,
    now: f32,
) -> Particle {
    let random = Vec4::new(rng.gen(), rng.gen(), rng.gen(), rng.gen());

    let lifetime = settings.lifetime.lerp(random.x);
    let direction = settings.direction.sample(rng).normalize_or_zero();
    let speed = settings.initial_speed.sample(rng);
    let velocity = base_velocity * settings.emitter_velocity_sensitivity + direction * speed;
    let acceleration = derive_acceleration(&settings.acceleration, velocity, lifetime, rng);

    Particle {
        spawn_position: position,
        position,
        initial_velocity: velocity,
        velocity,
        acceleration,
        spawn_time: now,
        age: 0.0,
        lifetime,
        random,
        rotation: settings.rotation.sample(rng),
        rotation_speed: settings.rotation_speed.lerp(random.w),
        // 大小与颜色共用一个随机值，使大粒子始终偏大、色调保持一致
        start_size: settings.start_size.lerp(random.y),
        end_size: settings.end_size.lerp(random.y),
        start_color: settings.start_color.lerp(random.z),
        end_color: settings.end_color.lerp(random.z),
    }
}

// ============================================================================
// 拖尾发射器
// ============================================================================

/// 拖尾发射器
///
/// 跟随一个移动的物体（例如投射物），按固定速率沿上一帧到本帧的路径发射粒子。
/// 不足一个间隔的剩余时间会累积到下一帧。
#[derive(Debug, Clone)]
pub struct TrailEmitter {
    time_between_particles: f32,
    previous_position: Vec3,
    time_left_over: f32,
}

impl TrailEmitter {
    pub fn new(particles_per_second: f32, initial_position: Vec3) -> SettingsResult<Self> {
        if !particles_per_second.is_finite() || particles_per_second <= 0.0 {
            return Err(SettingsError::invalid_value(
                "particles_per_second",
                format!("emission rate must be positive, got {particles_per_second}"),
            ));
        }

        Ok(Self {
            time_between_particles: 1.0 / particles_per_second,
            previous_position: initial_position,
            time_left_over: 0.0,
        })
    }

    /// 当前跟随的位置
    pub fn position(&self) -> Vec3 {
        self.previous_position
    }

    /// 更新发射器位置并发射粒子，返回实际发射数量
    pub fn update(
        &mut self,
        system: &mut ParticleSystem,
        delta_time: f32,
        new_position: Vec3,
    ) -> usize {
        let mut emitted = 0;

        if delta_time > 0.0 && delta_time.is_finite() {
            let velocity = (new_position - self.previous_position) / delta_time;

            let mut time_to_spend = self.time_left_over + delta_time;
            let mut current_time = -self.time_left_over;

            // 单帧最多发射 capacity 个，超出部分跳过路径前段，只保留最近的粒子
            let capacity = system.capacity();
            let due = (time_to_spend / self.time_between_particles) as usize;
            if due > capacity + 1 {
                let skipped = (due - capacity - 1) as f32 * self.time_between_particles;
                current_time += skipped;
                time_to_spend -= skipped;
                tracing::trace!(
                    target: "particles",
                    "Trail emitter skipped {} particles after a long frame",
                    due - capacity - 1
                );
            }

            let mut attempts = 0;
            while time_to_spend > self.time_between_particles && attempts < capacity {
                current_time += self.time_between_particles;
                time_to_spend -= self.time_between_particles;
                attempts += 1;

                let mu = current_time / delta_time;
                let position = self.previous_position.lerp(new_position, mu);
                emitted += system.spawn(position, velocity, 1);
            }

            self.time_left_over = time_to_spend.min(self.time_between_particles);
        }

        self.previous_position = new_position;
        emitted
    }

    /// 重置发射器
    pub fn reset(&mut self, position: Vec3) {
        self.previous_position = position;
        self.time_left_over = 0.0;
    }
}
