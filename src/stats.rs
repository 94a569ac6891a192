use std::sync::atomic::{AtomicU64, Ordering};

/// The six event hooks the core reports through. A no-op default
/// (`NullStats`) means a caller who doesn't care pays nothing for it.
pub trait Stats: Default {
    fn on_enqueue_success(&self) {}
    fn on_dequeue_success(&self) {}
    fn on_queue_create(&self) {}
    fn on_repeat_enqueue(&self) {}
    fn on_return_empty(&self) {}
    fn on_close_queue(&self) {}

    /// A point-in-time copy of whatever counters this sink tracks.
    /// `NullStats` returns all zeros.
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::default()
    }
}

/// No-op statistics sink, and the default for `SpQueue`.
#[derive(Debug, Default)]
pub struct NullStats;

impl Stats for NullStats {}

/// A point-in-time copy of a [`QueueStats`] accumulator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub enqueue_success: u64,
    pub dequeue_success: u64,
    pub queue_create: u64,
    pub repeat_enqueue: u64,
    pub return_empty: u64,
    pub close_queue: u64,
}

/// Relaxed-atomic event counters for every hook, plus a `tracing` emission
/// for the queue-replacement event (the one event an operator debugging
/// contention is most likely to want visible without wiring up a sink).
#[derive(Debug, Default)]
pub struct QueueStats {
    enqueue_success: AtomicU64,
    dequeue_success: AtomicU64,
    queue_create: AtomicU64,
    repeat_enqueue: AtomicU64,
    return_empty: AtomicU64,
    close_queue: AtomicU64,
}

impl Stats for QueueStats {
    fn on_enqueue_success(&self) {
        self.enqueue_success.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::trace!("spqueue: enqueue succeeded");
    }

    fn on_dequeue_success(&self) {
        self.dequeue_success.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::trace!("spqueue: dequeue succeeded");
    }

    fn on_queue_create(&self) {
        self.queue_create.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!("spqueue: installed a fresh queue instance");
    }

    fn on_repeat_enqueue(&self) {
        self.repeat_enqueue.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::trace!("spqueue: enqueue retrying");
    }

    fn on_return_empty(&self) {
        self.return_empty.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::trace!("spqueue: dequeue observed empty/closed");
    }

    fn on_close_queue(&self) {
        self.close_queue.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!("spqueue: closing queue instance, rebuild pending");
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueue_success: self.enqueue_success.load(Ordering::Relaxed),
            dequeue_success: self.dequeue_success.load(Ordering::Relaxed),
            queue_create: self.queue_create.load(Ordering::Relaxed),
            repeat_enqueue: self.repeat_enqueue.load(Ordering::Relaxed),
            return_empty: self.return_empty.load(Ordering::Relaxed),
            close_queue: self.close_queue.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_stats_snapshot_is_all_zero() {
        let stats = NullStats::default();
        stats.on_enqueue_success();
        stats.on_close_queue();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn queue_stats_snapshot_counts_each_hook_independently() {
        let stats = QueueStats::default();
        stats.on_enqueue_success();
        stats.on_enqueue_success();
        stats.on_close_queue();
        let snap = stats.snapshot();
        assert_eq!(snap.enqueue_success, 2);
        assert_eq!(snap.close_queue, 1);
        assert_eq!(snap.dequeue_success, 0);
    }
}
