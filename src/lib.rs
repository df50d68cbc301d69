//! # Particle Engine
//!
//! A fixed-capacity, frame-driven particle simulation engine built with Rust.
//!
//! ## Features
//!
//! - **Data-only settings**: spawn ranges, lifetime, size/color interpolation and
//!   acceleration modes, validated once at construction
//! - **Fixed-capacity pool**: all particle records allocated up front, no allocation per tick
//! - **Graceful saturation**: spawn requests beyond capacity are dropped (or recycle the oldest)
//! - **Effect presets**: explosion, smoke, fire, projectile trails, indexed by enum tag
//! - **Renderer-agnostic output**: read-only particle views and `Pod` vertices
//!
//! ## Architecture Design
//!
//! - **Settings**: immutable configuration record (`particles::settings`)
//! - **Pool**: slot storage with Free / Live / Retired lifecycle (`particles::pool`)
//! - **Emitter**: samples new particles from settings (`particles::emitter`)
//! - **Simulator**: ages and integrates live particles (`particles::simulator`)
//!
//! ### Example
//!
//! ```
//! use glam::Vec3;
//! use particle_engine::particles::{ParticleEffect, ParticleManager};
//!
//! let mut manager = ParticleManager::with_presets().unwrap();
//! manager.spawn(ParticleEffect::Explosion, Vec3::ZERO, Vec3::ZERO, 40);
//! manager.update(1.0 / 60.0);
//! assert!(manager.total_live() <= 40);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and helper macros
//! - [`config`]: Engine configuration (TOML/JSON, env overrides)
//! - [`particles`]: Particle settings, pool, emitter, simulator and manager

/// Core infrastructure: error types, logging initialization and macros
pub mod core;
/// Configuration system
pub mod config;
/// Particle simulation
pub mod particles;

pub use crate::core::{ParticleError, ParticleResult, SettingsError};
pub use particles::{
    AccelerationMode, ParticleEffect, ParticleManager, ParticleSettings, ParticleSystem,
    ParticleView,
};
