//! Spawn-pattern strategies
//!
//! How direction/velocity vectors are computed at fire time. One tagged
//! enum instead of an emitter subclass per pattern; the emitter core stays
//! identical across all of them.

use glam::Vec2;

use crate::config::PatternConfig;
use crate::rotate_vec;
use std::f32::consts::TAU;

/// One projectile to spawn: local offset from the emitter plus a unit
/// velocity direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnShot {
    pub offset: Vec2,
    pub direction: Vec2,
}

/// One spoke group: an independent fan direction that rotates between fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterGroup {
    pub direction: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// One projectile along the pattern direction per fire.
    Basic { direction: Vec2 },
    /// Groups spread over the full circle, each fanning `spoke_count` shots
    /// alternating left/right of the group direction.
    Spoke {
        groups: Vec<EmitterGroup>,
        spoke_count: u32,
        spoke_spacing: f32,
    },
    /// Rigid template of local offsets fired as one volley.
    Shape { direction: Vec2, offsets: Vec<Vec2> },
}

impl Pattern {
    pub fn from_config(config: &PatternConfig, direction: Vec2) -> Self {
        let direction = direction.normalize_or(Vec2::Y);
        match config {
            PatternConfig::Basic => Pattern::Basic { direction },
            PatternConfig::Spoke {
                group_count,
                spoke_count,
                spoke_spacing,
            } => {
                let count = (*group_count).max(1);
                let groups = (0..count)
                    .map(|n| EmitterGroup {
                        direction: rotate_vec(direction, TAU * n as f32 / count as f32),
                    })
                    .collect();
                Pattern::Spoke {
                    groups,
                    spoke_count: (*spoke_count).max(1),
                    spoke_spacing: *spoke_spacing,
                }
            }
            PatternConfig::Shape { offsets } => Pattern::Shape {
                direction,
                offsets: offsets.clone(),
            },
        }
    }

    /// Collect this fire's shots into `out`, spending at most `available`
    /// pool slots. Groups are all-or-nothing: a group (or template) that
    /// does not fit in the remaining slots is skipped whole, never split.
    /// After a successful fire the pattern direction advances by
    /// `rotation_per_fire` radians.
    pub fn fire(&mut self, available: usize, rotation_per_fire: f32, out: &mut Vec<SpawnShot>) {
        out.clear();
        match self {
            Pattern::Basic { direction } => {
                if available >= 1 {
                    out.push(SpawnShot {
                        offset: Vec2::ZERO,
                        direction: *direction,
                    });
                    *direction = rotate_vec(*direction, rotation_per_fire);
                }
            }
            Pattern::Spoke {
                groups,
                spoke_count,
                spoke_spacing,
            } => {
                let mut remaining = available;
                for group in groups.iter_mut() {
                    if remaining < *spoke_count as usize {
                        continue;
                    }
                    remaining -= *spoke_count as usize;

                    // Fan out alternating left/right of the group direction.
                    let mut rotation = 0.0;
                    let mut left = true;
                    for _ in 0..*spoke_count {
                        let dir = if left {
                            let d = rotate_vec(group.direction, rotation);
                            rotation += *spoke_spacing;
                            d
                        } else {
                            rotate_vec(group.direction, -rotation)
                        };
                        out.push(SpawnShot {
                            offset: Vec2::ZERO,
                            direction: dir.normalize_or(Vec2::Y),
                        });
                        left = !left;
                    }

                    group.direction = rotate_vec(group.direction, rotation_per_fire);
                }
            }
            Pattern::Shape { direction, offsets } => {
                if available >= offsets.len() {
                    for &offset in offsets.iter() {
                        out.push(SpawnShot {
                            offset,
                            direction: *direction,
                        });
                    }
                    *direction = rotate_vec(*direction, rotation_per_fire);
                }
            }
        }
    }
}
