//! Barrage - pooled bullet-hell projectile simulation
//!
//! Core modules:
//! - `pool`: Fixed-capacity slot pools with stable indices
//! - `sim`: Fixed-timestep scheduling, active-set iteration, projectile physics
//! - `collision` / `view`: Consumed backend boundaries (swept queries, frustum culling)
//! - `render`: Batched per-visual-type instance records for the renderer
//! - `manager`: Shared context owning the output buffers
//! - `config`: Data-driven per-emitter parameters

pub mod collision;
pub mod config;
pub mod error;
pub mod manager;
pub mod pool;
pub mod pulse;
pub mod render;
pub mod sim;
pub mod view;

pub use config::EmitterConfig;
pub use error::SimError;
pub use manager::{SimContext, VisualKey};
pub use sim::Emitter;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default fixed simulation timestep (100 Hz)
    pub const DEFAULT_FIXED_STEP: f32 = 0.01;
    /// Maximum sub-steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Rotate a vector by `radians` counter-clockwise.
#[inline]
pub fn rotate_vec(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}
