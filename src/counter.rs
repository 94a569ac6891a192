use std::sync::atomic::{AtomicIsize, Ordering};

/// External item counter consumed by `enqueue`/`dequeue`.
///
/// `size()` reads this counter rather than `tail - cnt_deq`, keeping the
/// ticket counters (used for slot routing) separate from a dedicated item
/// count; it may transiently disagree with `tail - cnt_deq` under
/// concurrent access.
pub trait ItemCounter: Default {
    fn increment(&self);
    fn decrement(&self);
    fn get(&self) -> usize;
}

/// Default item counter: a relaxed atomic. Per the concurrency contract,
/// relaxed ordering is permitted for statistics-style counters since
/// `size()` is documented as a best-effort observer, not a linearizable
/// one.
#[derive(Debug, Default)]
pub struct AtomicAdaptiveCounter {
    count: AtomicIsize,
}

impl ItemCounter for AtomicAdaptiveCounter {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn decrement(&self) {
        self.count.fetch_sub(1, Ordering::Relaxed);
    }

    fn get(&self) -> usize {
        self.count.load(Ordering::Relaxed).max(0) as usize
    }
}

/// A no-op counter for callers who never call `size()` and don't want to
/// pay for the atomic traffic.
#[derive(Debug, Default)]
pub struct NullCounter;

impl ItemCounter for NullCounter {
    fn increment(&self) {}
    fn decrement(&self) {}
    fn get(&self) -> usize {
        0
    }
}
