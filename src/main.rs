use glam::Vec3;
use particle_engine::config::EngineConfig;
use particle_engine::core::{init_logging, ParticleResult};
use particle_engine::particles::{ParticleEffect, ParticleManager, TrailEmitter};

const FRAME_DT: f32 = 1.0 / 60.0;
const FLIGHT_SECONDS: f32 = 1.0;
const TOTAL_SECONDS: f32 = 4.0;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

fn main() {
    if let Err(e) = run() {
        eprintln!("Particle demo failed: {}", e);
        std::process::exit(1);
    }
}

/// 岩石抛射并爆炸的演示场景
///
/// 飞行阶段由拖尾发射器跟随岩石，落地时触发爆炸、烟雾和碎屑。
fn run() -> ParticleResult<()> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load_or_default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    init_logging(&config.logging);

    let mut manager = ParticleManager::new(&config)?;

    let launch_position = Vec3::ZERO;
    let launch_velocity = Vec3::new(12.0, 8.0, 0.0);
    let mut trail = TrailEmitter::new(120.0, launch_position)?;
    let mut rock_position = launch_position;
    let mut exploded = false;

    let total_frames = (TOTAL_SECONDS / FRAME_DT).round() as u32;
    for frame in 1..=total_frames {
        let t = frame as f32 * FRAME_DT;

        if t <= FLIGHT_SECONDS {
            rock_position = launch_position + launch_velocity * t + 0.5 * GRAVITY * t * t;
            trail.update(
                manager.system_mut(ParticleEffect::ProjectileTrail),
                FRAME_DT,
                rock_position,
            );
        } else if !exploded {
            let emitted = manager.spawn(ParticleEffect::Explosion, rock_position, Vec3::ZERO, 60)
                + manager.spawn(ParticleEffect::ExplosionSmoke, rock_position, Vec3::ZERO, 40)
                + manager.spawn(ParticleEffect::RockDebris, rock_position, Vec3::ZERO, 30);
            tracing::info!(
                target: "engine",
                "Rock exploded at {:?}, {} particles emitted",
                rock_position,
                emitted
            );
            exploded = true;
        }

        manager.update(FRAME_DT);

        if frame % 60 == 0 {
            tracing::info!(
                target: "engine",
                "t={:.2}s live particles={}",
                t,
                manager.total_live()
            );
        }
    }

    for (effect, system) in manager.iter() {
        let stats = system.stats();
        tracing::info!(
            target: "engine",
            "{}: emitted={} dropped={} retired={} recycled={} alive={}",
            effect.name(),
            stats.total_emitted,
            stats.total_dropped,
            stats.total_retired,
            stats.total_recycled,
            stats.alive_count
        );
    }

    Ok(())
}
