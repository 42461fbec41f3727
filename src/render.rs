//! Batched render records
//!
//! The simulation's only output: per visual type, a contiguous buffer of
//! instance records plus a count of valid entries, refreshed once per frame.
//! Upload and draw submission belong to the host renderer.

use bytemuck::{Pod, Zeroable};

use crate::sim::Projectile;

/// One rendered projectile. 32 bytes, matches a `vec2 + float + float +
/// vec4` instance layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ProjectileInstance {
    pub position: [f32; 2],
    pub scale: f32,
    pub rotation: f32,
    pub color: [f32; 4],
}

impl ProjectileInstance {
    pub fn from_record(p: &Projectile) -> Self {
        Self {
            position: p.position.to_array(),
            scale: p.scale,
            rotation: p.rotation,
            color: p.color,
        }
    }
}

/// Fixed-capacity instance buffer for one visual type.
///
/// Write order is the insertion order of the active-set traversal; the
/// cursor resets once per frame (via [`crate::SimContext::begin_frame`])
/// before any emitter writes, so multiple emitters sharing a visual type
/// batch into the same buffer.
#[derive(Debug, Clone)]
pub struct RenderBatch {
    instances: Vec<ProjectileInstance>,
    capacity: usize,
}

impl RenderBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn reset(&mut self) {
        self.instances.clear();
    }

    /// Append one record; writes past capacity are dropped (the type's
    /// configured maximum is the renderer's buffer size).
    pub fn push(&mut self, instance: ProjectileInstance) {
        if self.instances.len() < self.capacity {
            self.instances.push(instance);
        }
    }

    /// Valid records written this frame.
    pub fn instances(&self) -> &[ProjectileInstance] {
        &self.instances
    }
}
