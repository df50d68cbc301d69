//! CPU 粒子系统模块
//!
//! 固定容量、单线程、按帧驱动的粒子模拟。粒子池初始化之后，发射与更新都不再分配内存。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Particle System                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Emission (spawn)                                     │
//! │     - 从空闲槽位分配新粒子，必要时回收已过期槽位            │
//! │     - 按设置采样位置、速度、生命周期、大小和颜色             │
//! │     - 粒子池饱和时静默丢弃                                 │
//! │                                                          │
//! │  2. Simulation (advance)                                 │
//! │     - 年龄按步长累加，截断到生命周期                        │
//! │     - 显式欧拉积分，按加速度模式更新速度                    │
//! │     - 过期粒子标记为 Retired                              │
//! │                                                          │
//! │  3. Rendering (外部)                                     │
//! │     - 只读遍历 ParticleView / ParticleVertex              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```
//! use glam::Vec3;
//! use particle_engine::particles::{AccelerationMode, ParticleSettings, ParticleSystem};
//!
//! let settings = ParticleSettings::new(100)
//!     .with_lifetime(1.0, 2.0)
//!     .with_initial_speed(20.0, 30.0)
//!     .with_acceleration(AccelerationMode::EndVelocity { end_velocity: 0.0 });
//!
//! let mut system = ParticleSystem::with_seed(settings, 42).unwrap();
//! assert_eq!(system.spawn(Vec3::ZERO, Vec3::ZERO, 150), 100);
//!
//! system.advance(1.0 / 60.0);
//! for particle in system.iter_live() {
//!     assert!(particle.age <= particle.lifetime);
//! }
//! ```

pub mod clock;
pub mod effects;
pub mod emitter;
pub mod manager;
pub mod particle;
pub mod pool;
pub mod settings;
pub mod simulator;
pub mod system;


pub use clock::SimulationClock;
pub use effects::ParticleEffect;
pub use emitter::TrailEmitter;
pub use manager::ParticleManager;
pub use particle::{Particle, ParticleVertex, ParticleView};
pub use pool::{ParticlePool, SlotState};
pub use settings::{
    AccelerationMode, BlendMode, ColorRange, FloatRange, OverflowPolicy, ParticleSettings,
    RangeValue, SpawnRange, Vec3Range,
};
pub use simulator::{integrate, Simulator};
pub use system::{ParticleSystem, ParticleSystemStats};
