//! Shared simulation context
//!
//! Owns the per-visual-type output batches and the registration accounting.
//! Passed explicitly to emitters; there is no global instance. One
//! `begin_frame` per frame, then every emitter updates against the same
//! `&mut SimContext`, which serializes their batch writes.

use crate::error::SimError;
use crate::render::{ProjectileInstance, RenderBatch};

/// Handle to a registered visual type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualKey(usize);

#[derive(Debug)]
struct VisualType {
    name: String,
    max_instances: usize,
    /// Pool slots assigned by emitters of this type so far.
    assigned: usize,
    /// Over-allocation is reported once, then stays quiet.
    warned: bool,
    batch: RenderBatch,
}

/// Registry of visual types and owner of their render batches.
#[derive(Debug, Default)]
pub struct SimContext {
    visuals: Vec<VisualType>,
}

impl SimContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visual type with its renderer-side instance budget.
    pub fn register_visual(&mut self, name: &str, max_instances: usize) -> VisualKey {
        self.visuals.push(VisualType {
            name: name.to_string(),
            max_instances,
            assigned: 0,
            warned: false,
            batch: RenderBatch::new(max_instances),
        });
        VisualKey(self.visuals.len() - 1)
    }

    /// Account one emitter's pool capacity against a visual type.
    ///
    /// Exceeding the type's budget is degraded mode, not failure: the error
    /// is returned (and logged once) for information, the emitter stays
    /// registered and usable, and late emitters may starve for batch space.
    pub fn register_emitter(&mut self, visual: VisualKey, capacity: usize) -> Result<(), SimError> {
        let v = &mut self.visuals[visual.0];
        v.assigned += capacity;
        if v.assigned > v.max_instances {
            let err = SimError::OverAllocation {
                visual: visual.0,
                assigned: v.assigned,
                max: v.max_instances,
            };
            if !v.warned {
                v.warned = true;
                log::warn!("visual type '{}': {err}; late emitters may starve", v.name);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Reset every batch cursor. Call exactly once per frame, before any
    /// emitter update.
    pub fn begin_frame(&mut self) {
        for v in &mut self.visuals {
            v.batch.reset();
        }
    }

    pub(crate) fn push_instance(&mut self, visual: VisualKey, instance: ProjectileInstance) {
        self.visuals[visual.0].batch.push(instance);
    }

    /// The valid records written for a visual type this frame.
    pub fn instances(&self, visual: VisualKey) -> &[ProjectileInstance] {
        self.visuals[visual.0].batch.instances()
    }

    pub fn instance_count(&self, visual: VisualKey) -> usize {
        self.visuals[visual.0].batch.len()
    }

    pub fn visual_name(&self, visual: VisualKey) -> &str {
        &self.visuals[visual.0].name
    }
}
