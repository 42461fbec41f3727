//! Frame-driven simulation core
//!
//! Everything an emitter steps per fixed timestep lives here:
//! - `projectile`: the per-slot simulation record
//! - `active`: double-buffered live-index tracking
//! - `scheduler`: fixed-step accumulation and leaked-time spawn dispatch
//! - `pattern`: spawn-direction strategies (basic, spoke, preset shape)
//! - `emitter`: the integrator and batch writer tying them together

pub mod active;
pub mod emitter;
pub mod pattern;
pub mod projectile;
pub mod scheduler;

pub use active::{ActiveSet, END_OF_LIST};
pub use emitter::Emitter;
pub use pattern::{Pattern, SpawnShot};
pub use projectile::Projectile;
pub use scheduler::{SchedulerPhase, TimestepScheduler};
