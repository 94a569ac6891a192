use crossbeam_epoch::Guard;

/// Abstract safe-memory-reclamation service: protects loads of node and
/// queue pointers, and defers destruction until no thread can observe the
/// retired object.
///
/// The core algorithm in this crate consumes this contract directly
/// through `crossbeam_epoch`'s global collector rather than a per-queue
/// injected implementation, since epoch-based reclamation already
/// satisfies it crate-wide with no per-instance configuration needed. This
/// trait documents the seam spec'd out for the surrounding design (so a
/// hazard-pointer or GC-backed reclaimer could be substituted without
/// touching the enqueue/dequeue algorithm) without requiring every call
/// site to thread a reclaimer value through.
pub trait Reclaimer {
    /// Pins the current thread, returning a guard that protects any load
    /// performed while it is held.
    fn pin(&self) -> Guard;
}

/// The reclaimer this crate actually uses: a thin handle onto
/// `crossbeam_epoch`'s global collector.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpochReclaimer;

impl Reclaimer for EpochReclaimer {
    fn pin(&self) -> Guard {
        crossbeam_epoch::pin()
    }
}
