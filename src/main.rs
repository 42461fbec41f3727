//! Headless stress driver
//!
//! Runs a few seconds of simulated time with jittered frame deltas against
//! an SDF arena and logs live/spawn/batch statistics. Useful for eyeballing
//! throughput and for exercising the full frame protocol outside of tests:
//!
//! ```text
//! RUST_LOG=info cargo run --bin barrage-stress
//! ```

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use barrage::collision::{SdfShape, SdfWorld};
use barrage::config::{EmitterConfig, PatternConfig, PulseMode};
use barrage::view::OrthoView;
use barrage::{Emitter, SimContext};

const FRAMES: u32 = 600;
const BASE_DELTA: f32 = 1.0 / 60.0;

fn arena() -> SdfWorld {
    // Closed 40x24 box with two pillars mid-field.
    SdfWorld::new(vec![
        SdfShape::HalfPlane {
            normal: Vec2::Y,
            offset: -12.0,
        },
        SdfShape::HalfPlane {
            normal: Vec2::NEG_Y,
            offset: -12.0,
        },
        SdfShape::HalfPlane {
            normal: Vec2::X,
            offset: -20.0,
        },
        SdfShape::HalfPlane {
            normal: Vec2::NEG_X,
            offset: -20.0,
        },
        SdfShape::Circle {
            center: Vec2::new(-7.0, 0.0),
            radius: 1.5,
        },
        SdfShape::Circle {
            center: Vec2::new(7.0, 0.0),
            radius: 1.5,
        },
    ])
}

fn spinner_config() -> EmitterConfig {
    EmitterConfig {
        capacity: 4000,
        cooldown_time: 0.04,
        time_to_live: 6.0,
        speed: 6.0,
        scale: 0.15,
        rotation_speed: 0.12,
        bounce: true,
        absorb_x: 0.1,
        absorb_y: 0.1,
        draw_outlines: true,
        outline_size: 0.04,
        pulse_mode: PulseMode::Shared,
        pulse_speed: 4.0,
        pattern: PatternConfig::Spoke {
            group_count: 3,
            spoke_count: 4,
            spoke_spacing: 0.35,
        },
        ..EmitterConfig::default()
    }
}

fn turret_config() -> EmitterConfig {
    EmitterConfig {
        capacity: 256,
        auto_fire: false,
        cooldown_time: 0.25,
        time_to_live: 4.0,
        speed: 14.0,
        scale: 0.2,
        bounce: false,
        turn_intensity: 6.0,
        max_speed: 18.0,
        ..EmitterConfig::default()
    }
}

fn main() {
    env_logger::init();

    let world = arena();
    let view = OrthoView::new(Vec2::ZERO, Vec2::new(22.0, 14.0));
    let mut rng = Pcg32::seed_from_u64(7);

    let mut ctx = SimContext::new();
    let bullet = ctx.register_visual("bullet", 8192);
    let bullet_outline = ctx.register_visual("bullet-outline", 8192);
    let shell = ctx.register_visual("shell", 512);

    let mut spinner = Emitter::new(
        spinner_config(),
        Vec2::new(0.0, 4.0),
        bullet,
        Some(bullet_outline),
        &mut ctx,
    );
    let mut turret = Emitter::new(turret_config(), Vec2::new(0.0, -10.0), shell, None, &mut ctx);
    turret.set_target(Some(Vec2::new(0.0, 8.0)));

    log::info!("stepping {FRAMES} frames at ~{:.1} fps", 1.0 / BASE_DELTA);

    let mut elapsed = 0.0f32;
    for frame in 0..FRAMES {
        // Jittered frame delta: 50%..150% of the base, seeded and repeatable.
        let frame_delta = BASE_DELTA * rng.random_range(0.5..1.5);
        elapsed += frame_delta;

        ctx.begin_frame();
        spinner.update(frame_delta, &world, Some(&view), &mut ctx);
        turret.update(frame_delta, &world, Some(&view), &mut ctx);

        // Pull the trigger whenever the cooldown allows.
        turret.try_fire();

        if frame % 60 == 0 {
            log::info!(
                "t={elapsed:6.2}s live={:5} shells={:3} batches: bullet={} outline={} shell={}",
                spinner.live_count(),
                turret.live_count(),
                ctx.instance_count(bullet),
                ctx.instance_count(bullet_outline),
                ctx.instance_count(shell),
            );
        }
    }

    log::info!(
        "done: {} spinner spawns, {} turret spawns over {elapsed:.2}s simulated",
        spinner.spawned_total(),
        turret.spawned_total(),
    );
}
