//! 粒子模拟
//!
//! 每帧推进所有存活粒子的年龄与运动状态。积分采用显式欧拉法：
//! 位置使用步长开始时的速度，然后再用加速度更新速度。

use super::particle::Particle;
use super::pool::ParticlePool;
use super::settings::AccelerationMode;
use glam::Vec3;
use rand::Rng;

/// 根据加速度模式计算粒子的加速度
///
/// `EndVelocity` 模式由 `v_end = v0 + a·t` 解出，t 取粒子的生命周期。
pub(crate) fn derive_acceleration<R: Rng + ?Sized>(
    mode: &AccelerationMode,
    initial_velocity: Vec3,
    lifetime: f32,
    rng: &mut R,
) -> Vec3 {
    match mode {
        AccelerationMode::None => Vec3::ZERO,
        AccelerationMode::Scalar { range } => {
            initial_velocity.normalize_or_zero() * range.sample(rng)
        }
        AccelerationMode::Vector { range } => range.sample(rng),
        AccelerationMode::EndVelocity { end_velocity } => {
            initial_velocity * (end_velocity - 1.0) / lifetime
        }
    }
}

/// 将粒子推进 `delta_time` 秒
///
/// 年龄按步长累加并截断在 lifetime，因此积分步长不会越过生命周期终点。
/// 年龄只依赖步长，与模拟时钟的绝对值无关，长时间运行后精度不变。
/// 返回 `false` 表示粒子已过期。
pub fn integrate(particle: &mut Particle, delta_time: f32) -> bool {
    let new_age = (particle.age + delta_time.max(0.0)).min(particle.lifetime);
    let step = new_age - particle.age;

    if step > 0.0 {
        particle.position += particle.velocity * step;
        particle.velocity += particle.acceleration * step;
        particle.rotation += particle.rotation_speed * step;
        particle.age = new_age;
    }

    !particle.is_expired()
}

/// 模拟器
///
/// 持有单调递增的模拟时钟，仅用于记录发射时间和对外查询。
#[derive(Debug, Default, Clone, Copy)]
pub struct Simulator {
    current_time: f32,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前模拟时间（秒）
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// 推进模拟，返回本次过期的粒子数
    ///
    /// 负数或非有限的时间增量按 0 处理，保证时钟单调。
    pub fn advance(&mut self, pool: &mut ParticlePool, delta_time: f32) -> usize {
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::trace!(target: "particles", "Ignoring invalid delta time {}", delta_time);
            return 0;
        }
        if delta_time == 0.0 {
            return 0;
        }

        self.current_time += delta_time;
        pool.update_live(|particle| integrate(particle, delta_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::settings::{FloatRange, Vec3Range};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moving_particle(lifetime: f32) -> Particle {
        Particle {
            velocity: Vec3::new(1.0, 0.0, 0.0),
            initial_velocity: Vec3::new(1.0, 0.0, 0.0),
            lifetime,
            ..Default::default()
        }
    }

    #[test]
    fn test_integrate_euler_step() {
        let mut p = Particle {
            acceleration: Vec3::new(0.0, -10.0, 0.0),
            ..moving_particle(5.0)
        };

        assert!(integrate(&mut p, 0.5));
        assert!((p.position.x - 0.5).abs() < 1e-6);
        // 显式欧拉：第一步位置不受加速度影响
        assert_eq!(p.position.y, 0.0);
        assert!((p.velocity.y + 5.0).abs() < 1e-6);
        assert!((p.age - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_clamps_to_lifetime() {
        let mut p = moving_particle(1.0);
        assert!(!integrate(&mut p, 3.0));
        assert_eq!(p.age, 1.0);
        assert!((p.position.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_zero_step_is_noop() {
        let mut p = moving_particle(1.0);
        integrate(&mut p, 0.25);
        let before = p;
        integrate(&mut p, 0.0);
        assert_eq!(p, before);
    }

    #[test]
    fn test_integrate_accumulates_age() {
        let mut p = moving_particle(1.0);
        for _ in 0..3 {
            assert!(integrate(&mut p, 0.25));
        }
        assert_eq!(p.age, 0.75);
        assert!(!integrate(&mut p, 0.25));
        assert_eq!(p.age, 1.0);
    }

    #[test]
    fn test_end_velocity_acceleration() {
        let mut rng = StdRng::seed_from_u64(0);
        let v0 = Vec3::new(4.0, 2.0, 0.0);
        let a = derive_acceleration(
            &AccelerationMode::EndVelocity { end_velocity: 0.5 },
            v0,
            2.0,
            &mut rng,
        );
        assert!((v0 + a * 2.0 - v0 * 0.5).length() < 1e-5);
    }

    #[test]
    fn test_scalar_acceleration_along_velocity() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = derive_acceleration(
            &AccelerationMode::Scalar {
                range: FloatRange::constant(-3.0),
            },
            Vec3::new(0.0, 10.0, 0.0),
            1.0,
            &mut rng,
        );
        assert!((a - Vec3::new(0.0, -3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_vector_acceleration() {
        let mut rng = StdRng::seed_from_u64(0);
        let gravity = Vec3::new(0.0, -9.81, 0.0);
        let a = derive_acceleration(
            &AccelerationMode::Vector {
                range: Vec3Range::constant(gravity),
            },
            Vec3::X,
            1.0,
            &mut rng,
        );
        assert_eq!(a, gravity);
    }

    #[test]
    fn test_simulator_ignores_negative_delta() {
        let mut pool = ParticlePool::new(1);
        let mut sim = Simulator::new();
        sim.advance(&mut pool, 1.0);
        sim.advance(&mut pool, -0.5);
        sim.advance(&mut pool, f32::NAN);
        assert_eq!(sim.current_time(), 1.0);
    }

    #[test]
    fn test_ageing_independent_of_clock_magnitude() {
        let mut pool = ParticlePool::new(1);
        let mut sim = Simulator::new();
        // 2^20 秒之后 f32 时钟已无法表示 1/64 秒的增量
        sim.advance(&mut pool, 1_048_576.0);

        let index = pool.claim().unwrap();
        *pool.get_mut(index).unwrap() = moving_particle(1.0);

        for _ in 0..63 {
            sim.advance(&mut pool, 1.0 / 64.0);
        }
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.get(index).unwrap().age, 63.0 / 64.0);
        sim.advance(&mut pool, 1.0 / 64.0);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_simulator_retires_expired() {
        let mut pool = ParticlePool::new(2);
        let index = pool.claim().unwrap();
        *pool.get_mut(index).unwrap() = moving_particle(2.0);

        let mut sim = Simulator::new();
        assert_eq!(sim.advance(&mut pool, 1.0), 0);
        assert_eq!(pool.live_count(), 1);
        assert_eq!(sim.advance(&mut pool, 1.0), 1);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.retired_count(), 1);
    }
}
