/// Back-off strategy invoked between retries. A fresh instance is created
/// per `enqueue`/`dequeue` call and driven locally within that call's
/// retry loop — it is not shared across threads, matching how
/// `crossbeam_utils::Backoff` itself is meant to be used.
pub trait Backoff: Default {
    fn spin(&mut self);
}

/// The default strategy: spin briefly, then yield to the scheduler, via
/// `crossbeam_utils::Backoff`.
#[derive(Default)]
pub struct CrossbeamBackoff {
    inner: crossbeam_utils::Backoff,
}

impl Backoff for CrossbeamBackoff {
    fn spin(&mut self) {
        self.inner.snooze();
    }
}

/// Always spins; never yields. Useful for benchmarks and tests that want
/// to maximize contention rather than throughput.
#[derive(Default)]
pub struct SpinBackoff;

impl Backoff for SpinBackoff {
    fn spin(&mut self) {
        std::hint::spin_loop();
    }
}

/// Never waits at all between retries.
#[derive(Default)]
pub struct NoBackoff;

impl Backoff for NoBackoff {
    fn spin(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_strategy_can_spin_without_panicking() {
        CrossbeamBackoff::default().spin();
        SpinBackoff::default().spin();
        NoBackoff::default().spin();
    }
}
