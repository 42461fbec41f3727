//! Per-slot projectile state

use glam::Vec2;

use crate::pulse::ColorPulse;

/// Simulation state of one projectile. Zero-valued at pool construction,
/// fully repopulated on every spawn, mutated each sub-step while
/// `time_to_live > 0`.
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Multiplicative velocity growth per second.
    pub acceleration: f32,
    pub gravity: Vec2,
    pub scale: f32,
    /// Heading in radians, follows the velocity after each step.
    pub rotation: f32,
    /// Linear RGBA.
    pub color: [f32; 4],
    pub time_to_live: f32,
    /// Spawn-time TTL, kept for the fade fraction.
    pub initial_ttl: f32,
    /// Speed cap applied by the homing steer.
    pub speed: f32,
    pub pulse: ColorPulse,
    /// Index of the paired outline record, when outlines are enabled.
    /// Non-owning: the primary's release path releases the outline first.
    pub outline: Option<usize>,
}

impl Projectile {
    /// Consumed share of the lifetime, in [0, 1].
    pub fn ttl_fraction(&self) -> f32 {
        if self.initial_ttl <= 0.0 {
            1.0
        } else {
            (1.0 - self.time_to_live / self.initial_ttl).clamp(0.0, 1.0)
        }
    }
}
