use std::marker::PhantomData;
use std::sync::atomic::Ordering;

use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::CachePadded;

use crate::backoff::Backoff;
use crate::counter::ItemCounter;
use crate::instance::QueueInstance;
use crate::node::{is_empty_slot, is_picket, picket, Node, NodeAdapter};
use crate::stats::{Stats, StatsSnapshot};
use crate::traits::{DefaultTraits, QueueTraits};

/// Default stripe width: the number of parallel per-slot chains a logical
/// FIFO is striped across.
pub const DEFAULT_WIDTH: usize = 10;

/// A lock-free multi-producer / multi-consumer FIFO queue built on the
/// speculative pairing queue algorithm.
///
/// `W` is the stripe width (fixed at construction, not resizable). `Tr`
/// bundles the node adapter, statistics sink, back-off strategy, and item
/// counter this queue uses; [`DefaultTraits`] is a sensible out-of-the-box
/// choice for most callers.
///
/// ```
/// use spqueue::SpQueue;
///
/// let queue: SpQueue<i32> = SpQueue::new();
/// queue.enqueue(1);
/// queue.enqueue(2);
/// assert_eq!(queue.dequeue(), Some(1));
/// assert_eq!(queue.dequeue(), Some(2));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct SpQueue<T, const W: usize = DEFAULT_WIDTH, Tr: QueueTraits<T> = DefaultTraits> {
    current: CachePadded<Atomic<QueueInstance<T, W>>>,
    counter: Tr::Counter,
    stats: Tr::Stats,
    _marker: PhantomData<Tr>,
}

unsafe impl<T: Send, const W: usize, Tr: QueueTraits<T>> Send for SpQueue<T, W, Tr> {}
unsafe impl<T: Send, const W: usize, Tr: QueueTraits<T>> Sync for SpQueue<T, W, Tr> {}

impl<T, const W: usize, Tr: QueueTraits<T>> SpQueue<T, W, Tr> {
    /// Constructs an empty queue.
    ///
    /// # Panics
    /// Panics if `W` is zero; a zero-width stripe cannot route any ticket.
    pub fn new() -> Self {
        assert!(W > 0, "spqueue: stripe width must be non-zero");
        SpQueue {
            current: CachePadded::new(Atomic::new(QueueInstance::empty())),
            counter: Tr::Counter::default(),
            stats: Tr::Stats::default(),
            _marker: PhantomData,
        }
    }

    /// Inserts `value` at the tail of the queue.
    ///
    /// Never fails for lack of space (it may retry many times under heavy
    /// contention, and may trigger a queue-instance replacement if a slot
    /// has been closed).
    pub fn enqueue(&self, value: T) {
        let guard = &epoch::pin();
        let node = Tr::Adapter::to_node(value, 0);
        Tr::Adapter::check_unlinked(&node, guard);
        self.enqueue_node(node, guard);
    }

    /// Like [`SpQueue::enqueue`], but turns the debug-mode link-checker
    /// contract violation into a catchable error instead of an abort.
    /// Only available with the `fallible-link-check` feature; the default
    /// `enqueue` path is cheaper, treating a linked node reaching the queue
    /// as a caller bug rather than a runtime condition.
    #[cfg(feature = "fallible-link-check")]
    pub fn try_enqueue(&self, value: T) -> Result<(), crate::error::SpQueueError> {
        let guard = &epoch::pin();
        let node = Tr::Adapter::to_node(value, 0);
        if !node.next_is_unset(guard) {
            return Err(crate::error::SpQueueError::NodeStillLinked);
        }
        self.enqueue_node(node, guard);
        Ok(())
    }

    fn enqueue_node<'g>(&self, node: Owned<Node<T>>, guard: &'g Guard) {
        let mut node = node;
        let mut backoff = Tr::Backoff::default();

        loop {
            let q_shared = self.current.load(Ordering::Acquire, guard);
            let q = unsafe { q_shared.deref() };

            if q.invalid.load(Ordering::Acquire) {
                match self.try_install_fresh(q_shared, node, guard) {
                    Ok(()) => {
                        self.counter.increment();
                        self.stats.on_queue_create();
                        return;
                    }
                    Err(returned) => {
                        node = returned;
                        self.stats.on_repeat_enqueue();
                        backoff.spin();
                        continue;
                    }
                }
            }

            let t = q.tail.load(Ordering::Acquire);
            let i = (t as usize) % W;
            let slot = &q.slots[i];
            let last = slot.last.load(Ordering::Acquire, guard);

            if t == i as i64 {
                if is_empty_slot(last) {
                    // Empty-slot fast path: the first W enqueues each hit
                    // a distinct cacheline.
                    node.version = t;
                    match slot.head.compare_exchange(
                        Shared::null(),
                        node,
                        Ordering::Release,
                        Ordering::Relaxed,
                        guard,
                    ) {
                        Ok(new_shared) => {
                            slot.last.store(new_shared, Ordering::Relaxed);
                            let _ = q.tail.compare_exchange(
                                t,
                                t + 1,
                                Ordering::AcqRel,
                                Ordering::Relaxed,
                            );
                            self.counter.increment();
                            self.stats.on_enqueue_success();
                            return;
                        }
                        Err(e) => {
                            node = e.new;
                            if is_picket(e.current) {
                                q.invalid.store(true, Ordering::Release);
                            } else {
                                let _ = q.tail.compare_exchange(
                                    t,
                                    t + 1,
                                    Ordering::AcqRel,
                                    Ordering::Relaxed,
                                );
                            }
                            self.stats.on_repeat_enqueue();
                            backoff.spin();
                            continue;
                        }
                    }
                } else {
                    // First-row collision: another round already claimed
                    // this slot.
                    if is_picket(last) {
                        q.invalid.store(true, Ordering::Release);
                    } else {
                        let _ =
                            q.tail
                                .compare_exchange(t, t + 1, Ordering::AcqRel, Ordering::Relaxed);
                    }
                    self.stats.on_repeat_enqueue();
                    backoff.spin();
                    continue;
                }
            }

            // Subsequent-row path.
            let start = if is_empty_slot(last) {
                slot.head.load(Ordering::Acquire, guard)
            } else {
                last
            };

            if is_picket(start) {
                match self.try_install_fresh(q_shared, node, guard) {
                    Ok(()) => {
                        self.counter.increment();
                        self.stats.on_queue_create();
                        return;
                    }
                    Err(returned) => {
                        node = returned;
                        self.stats.on_repeat_enqueue();
                        backoff.spin();
                        continue;
                    }
                }
            }

            let mut n = unsafe { start.deref() };
            loop {
                let next = n.next.load(Ordering::Acquire, guard);
                let walkable = !is_picket(next) && !is_empty_slot(next) && n.version < t;
                if !walkable {
                    break;
                }
                n = unsafe { next.deref() };
            }

            if n.version >= t {
                let _ = q.tail.compare_exchange(t, t + 1, Ordering::AcqRel, Ordering::Relaxed);
                self.stats.on_repeat_enqueue();
                backoff.spin();
                continue;
            }

            node.version = t;
            match n.next.compare_exchange(
                Shared::null(),
                node,
                Ordering::Release,
                Ordering::Relaxed,
                guard,
            ) {
                Ok(new_shared) => {
                    slot.last.store(new_shared, Ordering::Relaxed);
                    let _ = q.tail.compare_exchange(t, t + 1, Ordering::AcqRel, Ordering::Relaxed);
                    self.counter.increment();
                    self.stats.on_enqueue_success();
                    return;
                }
                Err(e) => {
                    node = e.new;
                    if is_picket(e.current) {
                        q.invalid.store(true, Ordering::Release);
                    }
                    self.stats.on_repeat_enqueue();
                    backoff.spin();
                    continue;
                }
            }
        }
    }

    /// Removes and returns the oldest not-yet-dequeued payload, or `None`
    /// if the queue is observed empty or closed.
    pub fn dequeue(&self) -> Option<T> {
        let guard = &epoch::pin();

        loop {
            let q_shared = self.current.load(Ordering::Acquire, guard);
            let q = unsafe { q_shared.deref() };

            if q.invalid.load(Ordering::Acquire) {
                self.stats.on_return_empty();
                return None;
            }

            let c = q.cnt_deq.fetch_add(1, Ordering::AcqRel);
            let i = (c as usize) % W;
            let slot = &q.slots[i];

            if c >= q.tail.load(Ordering::Acquire) && c == i as i64 {
                if slot
                    .head
                    .compare_exchange(
                        Shared::null(),
                        picket(),
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                        guard,
                    )
                    .is_ok()
                {
                    self.close(q, i);
                    return None;
                }
            }

            let mut n = slot.removed.load(Ordering::Acquire, guard);
            if is_empty_slot(n) {
                n = slot.head.load(Ordering::Acquire, guard);
            }

            if is_picket(n) {
                self.close(q, i);
                return None;
            }

            let mut n_ref = unsafe { n.deref() };
            if n_ref.version > c {
                n = slot.head.load(Ordering::Acquire, guard);
                if is_picket(n) {
                    self.close(q, i);
                    return None;
                }
                n_ref = unsafe { n.deref() };
            }

            loop {
                if n_ref.version >= c {
                    break;
                }

                let next = n_ref.next.load(Ordering::Acquire, guard);
                if is_empty_slot(next) {
                    match n_ref.next.compare_exchange(
                        Shared::null(),
                        picket(),
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                        guard,
                    ) {
                        Ok(_) => {
                            self.close(q, i);
                            return None;
                        }
                        Err(e) => {
                            if is_picket(e.current) {
                                self.close(q, i);
                                return None;
                            }
                            n = e.current;
                            n_ref = unsafe { n.deref() };
                            continue;
                        }
                    }
                }

                if is_picket(next) {
                    self.close(q, i);
                    return None;
                }

                n = next;
                n_ref = unsafe { n.deref() };
            }

            debug_assert_eq!(n_ref.version, c);
            slot.removed.store(n, Ordering::Release);
            slot.removed_version.store(n_ref.version, Ordering::Release);
            self.counter.decrement();
            self.stats.on_dequeue_success();
            let value = unsafe { Tr::Adapter::to_value(n_ref) };
            return Some(value);
        }
    }

    /// Alias for [`SpQueue::enqueue`].
    pub fn push(&self, value: T) {
        self.enqueue(value)
    }

    /// Alias for [`SpQueue::dequeue`].
    pub fn pop(&self) -> Option<T> {
        self.dequeue()
    }

    /// Best-effort emptiness check: `tail <= cnt_deq`, modulo invalidation.
    /// Not a linearizable predicate.
    pub fn empty(&self) -> bool {
        let guard = &epoch::pin();
        let q = unsafe { self.current.load(Ordering::Acquire, guard).deref() };
        if q.invalid.load(Ordering::Acquire) {
            return true;
        }
        q.tail.load(Ordering::Acquire) <= q.cnt_deq.load(Ordering::Acquire)
    }

    /// The external item counter's current reading. May transiently
    /// disagree with `tail - cnt_deq` under concurrent access.
    pub fn size(&self) -> usize {
        self.counter.get()
    }

    /// Non-atomic drain: repeatedly dequeues until the queue is empty.
    pub fn clear(&self) {
        while self.dequeue().is_some() {}
    }

    /// A snapshot of this queue's statistics, if its trait bundle collects
    /// them (the default `NullStats` always reports zeros).
    pub fn statistics(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Closes slot `idx` of `q`: marks the instance invalid and plants
    /// PICKET into the slot's `removed` watermark so later dequeues on
    /// this instance short-circuit immediately.
    fn close(&self, q: &QueueInstance<T, W>, idx: usize) {
        q.invalid.store(true, Ordering::Release);
        q.slots[idx].removed.store(picket(), Ordering::Release);
        self.stats.on_close_queue();
    }

    /// Builds a fresh instance seeded with `node` and attempts to install
    /// it as the current instance via compare-and-set, replacing `old`.
    ///
    /// On success the old instance is handed to the reclaimer and `node`
    /// has been consumed. On failure `node`'s allocation is recovered
    /// (never leaked, never double-freed) so the caller can retry it
    /// against whatever instance won the race.
    fn try_install_fresh<'g>(
        &self,
        old: Shared<'g, QueueInstance<T, W>>,
        mut node: Owned<Node<T>>,
        guard: &'g Guard,
    ) -> Result<(), Owned<Node<T>>> {
        node.version = 0;
        let node_shared = node.into_shared(guard);
        let new_instance = Owned::new(QueueInstance::seeded(node_shared));

        match self
            .current
            .compare_exchange(old, new_instance, Ordering::AcqRel, Ordering::Relaxed, guard)
        {
            Ok(_) => {
                unsafe { guard.defer_destroy(old) };
                Ok(())
            }
            Err(e) => {
                // `e.new` is the instance we just built; it was never
                // installed, so nothing else can observe it or the node
                // inside it. Detach the node before dropping the shell so
                // the shell's own Drop doesn't also try to free it.
                let discarded = e.new.into_box();
                let reclaimed_node = unsafe { node_shared.into_owned() };
                discarded.slots[0].head.store(Shared::null(), Ordering::Relaxed);
                discarded.slots[0].last.store(Shared::null(), Ordering::Relaxed);
                drop(discarded);
                Err(reclaimed_node)
            }
        }
    }
}

impl<T, const W: usize, Tr: QueueTraits<T>> Default for SpQueue<T, W, Tr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const W: usize, Tr: QueueTraits<T>> Drop for SpQueue<T, W, Tr> {
    fn drop(&mut self) {
        // Exclusive access: no other thread can hold a reference to this
        // queue by the time `drop` runs, so the traversal inside
        // `QueueInstance::drop` needs no protection from here either.
        let guard = unsafe { epoch::unprotected() };
        let shared = self.current.load(Ordering::Relaxed, guard);
        if !shared.is_null() {
            drop(unsafe { shared.into_owned() });
        }
    }
}
