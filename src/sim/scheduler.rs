//! Fixed-timestep scheduling with leaked-time spawn dispatch
//!
//! Two timers run side by side. The cooldown timer converts elapsed frame
//! time into pending spawn requests; requests never fire mid-frame, only at
//! a fixed sub-step boundary so motion and collision start from a consistent
//! state. The step timer accumulates frame deltas and releases whole fixed
//! steps. When several requests drain inside one step, each is back-dated by
//! `remaining_pending * fixed_step` so projectiles queued earlier in the
//! frame show positions consistent with having launched at staggered times
//! rather than all at once.

use crate::consts::MAX_SUBSTEPS;

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No unconsumed time is banked.
    Idle,
    /// Frame time is banked but less than one fixed step.
    Accumulating,
    /// A fixed sub-step is being consumed and its spawns drained.
    Dispatching,
}

#[derive(Debug, Clone)]
pub struct TimestepScheduler {
    cooldown_time: f32,
    fixed_step: f32,
    auto_fire: bool,
    cooldown_remaining: f32,
    step_timer: f32,
    pending: u32,
    steps_this_frame: u32,
    phase: SchedulerPhase,
}

impl TimestepScheduler {
    pub fn new(cooldown_time: f32, fixed_step: f32, auto_fire: bool) -> Self {
        Self {
            cooldown_time,
            fixed_step,
            auto_fire,
            cooldown_remaining: cooldown_time,
            step_timer: 0.0,
            pending: 0,
            steps_this_frame: 0,
            phase: SchedulerPhase::Idle,
        }
    }

    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Bank a frame delta: advance the cooldown (queuing one pending spawn
    /// request per expiry in auto-fire mode) and the step accumulator.
    pub fn accrue(&mut self, frame_delta: f32) {
        self.steps_this_frame = 0;

        if self.auto_fire {
            self.cooldown_remaining -= frame_delta;
            while self.cooldown_remaining <= 0.0 {
                self.cooldown_remaining += self.cooldown_time;
                self.pending += 1;
            }
        } else {
            // Manual mode: the cooldown drains but never banks shots.
            self.cooldown_remaining = (self.cooldown_remaining - frame_delta).max(0.0);
        }

        self.step_timer += frame_delta;
        self.phase = if self.step_timer > 0.0 {
            SchedulerPhase::Accumulating
        } else {
            SchedulerPhase::Idle
        };
    }

    /// Try to consume one fixed step from the accumulator. Capped at
    /// [`MAX_SUBSTEPS`] per frame; leftover time stays banked so no spawn
    /// request is ever lost to the cap.
    pub fn consume_step(&mut self) -> bool {
        if self.step_timer > self.fixed_step && self.steps_this_frame < MAX_SUBSTEPS {
            self.step_timer -= self.fixed_step;
            self.steps_this_frame += 1;
            self.phase = SchedulerPhase::Dispatching;
            true
        } else {
            self.phase = if self.step_timer > 0.0 {
                SchedulerPhase::Accumulating
            } else {
                SchedulerPhase::Idle
            };
            false
        }
    }

    /// Drain one pending spawn request, returning its leaked time. Requests
    /// drain oldest first, so the first returned leaked time is the largest.
    pub fn next_spawn(&mut self) -> Option<f32> {
        if self.pending == 0 {
            return None;
        }
        self.pending -= 1;
        Some(self.pending as f32 * self.fixed_step)
    }

    /// Manual fire request. Accepted only when the cooldown has fully
    /// drained; acceptance queues one pending spawn and resets the cooldown.
    pub fn request_fire(&mut self) -> bool {
        if self.auto_fire || self.cooldown_remaining > 0.0 {
            return false;
        }
        self.cooldown_remaining = self.cooldown_time;
        self.pending += 1;
        true
    }
}
