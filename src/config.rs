//! Per-emitter configuration
//!
//! Loaded externally (JSON) before an emitter starts; nothing here changes
//! mid-flight except through an explicit rebuild of the emitter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape of the swept collision query issued per projectile per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionMode {
    /// Thin ray along the step delta.
    Raycast,
    /// Circle of the projectile's render radius swept along the delta.
    #[default]
    CircleCast,
}

/// How projectile color is driven over a lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PulseMode {
    /// Linear fade: gradient position follows consumed TTL fraction.
    #[default]
    TtlFade,
    /// Each projectile carries its own oscillator phase, seeded at spawn.
    PerProjectile,
    /// One emitter-wide oscillator; every projectile shares the same beat.
    Shared,
}

/// One gradient stop: position in [0, 1] and linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub t: f32,
    pub color: [f32; 4],
}

/// Piecewise-linear color ramp, evaluated by clamped position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            stops: vec![
                GradientStop {
                    t: 0.0,
                    color: [1.0, 1.0, 1.0, 1.0],
                },
                GradientStop {
                    t: 1.0,
                    color: [1.0, 1.0, 1.0, 0.0],
                },
            ],
        }
    }
}

impl Gradient {
    /// Build from stops; they are sorted by position on construction.
    pub fn new(mut stops: Vec<GradientStop>) -> Self {
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        if stops.is_empty() {
            return Self::default();
        }
        Self { stops }
    }

    /// Single flat color.
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            stops: vec![GradientStop { t: 0.0, color }],
        }
    }

    pub fn evaluate(&self, t: f32) -> [f32; 4] {
        let t = t.clamp(0.0, 1.0);
        // A deserialized gradient may carry no stops at all.
        let Some(first) = self.stops.first() else {
            return [1.0; 4];
        };
        if t <= first.t {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                let f = if span > 0.0 { (t - a.t) / span } else { 1.0 };
                let mut color = [0.0; 4];
                for (i, c) in color.iter_mut().enumerate() {
                    *c = a.color[i] + (b.color[i] - a.color[i]) * f;
                }
                return color;
            }
        }
        self.stops.last().map(|s| s.color).unwrap_or([1.0; 4])
    }
}

/// Spawn-pattern parameters: how direction/velocity vectors are computed at
/// fire time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind")]
pub enum PatternConfig {
    /// One projectile along the emitter direction per fire.
    #[default]
    Basic,
    /// `group_count` groups spread over the full circle, each fanning
    /// `spoke_count` projectiles at `spoke_spacing` radians.
    Spoke {
        group_count: u32,
        spoke_count: u32,
        spoke_spacing: f32,
    },
    /// Rigid template of local offsets fired as one volley.
    Shape { offsets: Vec<Vec2> },
}

/// Full per-emitter parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Primary pool capacity (outline pool matches when outlines are on).
    pub capacity: usize,
    pub time_to_live: f32,
    /// Seconds between spawn requests.
    pub cooldown_time: f32,
    pub auto_fire: bool,
    /// Simulation tick length in seconds.
    pub fixed_step: f32,
    pub direction: Vec2,
    pub speed: f32,
    /// Velocity magnitude cap, applied by the homing steer.
    pub max_speed: f32,
    /// Radians the pattern direction advances per fire.
    pub rotation_speed: f32,
    pub scale: f32,
    pub acceleration: f32,
    pub gravity: Vec2,
    /// Homing steer strength; 0 disables homing even when a target is set.
    pub turn_intensity: f32,
    pub collision_mode: CollisionMode,
    pub bounce: bool,
    pub absorb_x: f32,
    pub absorb_y: f32,
    pub cull_outside_view: bool,
    pub color: Gradient,
    pub pulse_mode: PulseMode,
    pub pulse_speed: f32,
    pub draw_outlines: bool,
    /// Added to the primary scale for the outline copy.
    pub outline_size: f32,
    pub outline_color: Gradient,
    pub pattern: PatternConfig,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            time_to_live: 5.0,
            cooldown_time: 0.1,
            auto_fire: true,
            fixed_step: crate::consts::DEFAULT_FIXED_STEP,
            direction: Vec2::Y,
            speed: 1.0,
            max_speed: 100.0,
            rotation_speed: 0.0,
            scale: 0.05,
            acceleration: 0.0,
            gravity: Vec2::ZERO,
            turn_intensity: 0.0,
            collision_mode: CollisionMode::CircleCast,
            bounce: true,
            absorb_x: 0.0,
            absorb_y: 0.0,
            cull_outside_view: true,
            color: Gradient::default(),
            pulse_mode: PulseMode::TtlFade,
            pulse_speed: 1.0,
            draw_outlines: false,
            outline_size: 0.0,
            outline_color: Gradient::solid([0.0, 0.0, 0.0, 1.0]),
            pattern: PatternConfig::Basic,
        }
    }
}

impl EmitterConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
