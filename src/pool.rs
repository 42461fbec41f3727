//! Fixed-capacity slot pool with stable indices
//!
//! Slots never move: a projectile's index is its identity for as long as the
//! pool exists, which is what lets outline links and active-set entries be
//! plain indices. Freed indices recycle FIFO so a released slot is not
//! immediately handed back while stale references to it may still be in
//! flight within the same frame.

use std::collections::VecDeque;

use crate::error::SimError;

/// One pool entry: the value plus its live flag.
#[derive(Debug, Clone, Default)]
pub struct Slot<T> {
    pub value: T,
    active: bool,
}

/// Fixed-capacity arena with a FIFO free-index queue.
///
/// Invariant: a slot's `active` flag is true iff its index is absent from
/// the free queue. The pool never grows; callers that need `k` slots as a
/// group must check `available_count() >= k` before acquiring any of them.
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    free: VecDeque<usize>,
}

impl<T: Default> SlotPool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        let mut free = VecDeque::with_capacity(capacity);
        for i in 0..capacity {
            slots.push(Slot {
                value: T::default(),
                active: false,
            });
            free.push_back(i);
        }
        Self { slots, free }
    }
}

impl<T> SlotPool<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn available_count(&self) -> usize {
        self.free.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.active)
    }

    /// Mark one previously-free slot active and return its index.
    ///
    /// The slot's value is whatever it held when last released; callers
    /// repopulate every field on spawn.
    pub fn acquire(&mut self) -> Result<usize, SimError> {
        let index = self.free.pop_front().ok_or(SimError::PoolExhausted)?;
        self.slots[index].active = true;
        Ok(index)
    }

    /// Return a slot to the free queue. Releasing an inactive index is a
    /// no-op, not an error.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.active {
                slot.active = false;
                self.free.push_back(index);
            }
        }
    }

    /// Release every slot unconditionally.
    pub fn clear(&mut self) {
        self.free.clear();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.active = false;
            self.free.push_back(i);
        }
    }

    /// Access an active slot's value.
    pub fn get(&self, index: usize) -> Option<&T> {
        let slot = self.slots.get(index)?;
        slot.active.then_some(&slot.value)
    }

    /// Mutable access to an active slot's value.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = self.slots.get_mut(index)?;
        slot.active.then_some(&mut slot.value)
    }
}
