//! Simulation error taxonomy
//!
//! Every variant is recoverable: a starved emitter skips its spawn group and
//! keeps running, an over-allocated visual type keeps rendering with late
//! emitters starving for batch space.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The free queue is empty; the spawn group that needed this slot is
    /// skipped in its entirety.
    #[error("slot pool exhausted")]
    PoolExhausted,

    /// An outline slot was addressed whose primary no longer holds the link.
    /// Release order (outline before primary) prevents this from occurring
    /// during normal operation.
    #[error("outline slot {0} is not active")]
    InvalidOutlineState(usize),

    /// Emitters of one visual type requested more pool capacity than the
    /// type's batch can hold. Reported once at registration; simulation
    /// continues with late emitters starving.
    #[error("visual type {visual} over-allocated: {assigned} slots assigned, batch holds {max}")]
    OverAllocation {
        visual: usize,
        assigned: usize,
        max: usize,
    },
}
