use std::sync::atomic::AtomicI64;

use crossbeam_epoch::Atomic;
use crossbeam_utils::CachePadded;

use crate::node::Node;

/// Sentinel `removed_version` for "nothing has been dequeued from this
/// slot yet" — lower than any real ticket, so every node in the chain
/// reads as not-yet-consumed.
pub(crate) const NOTHING_REMOVED: i64 = i64::MIN;

/// One stripe of the queue: a singly-linked chain of nodes, reachable from
/// `head`, plus hints that let producers and consumers skip most of the
/// chain on the common path.
pub(crate) struct Slot<T> {
    /// First node of the chain. Null means empty; PICKET means closed from
    /// the producer side. Read on every contended path, so it gets its own
    /// cache line.
    pub(crate) head: CachePadded<Atomic<Node<T>>>,

    /// Producer-side hint: the most recently appended node. May be stale;
    /// a producer or consumer that finds it stale simply restarts the walk
    /// from `head`. Never authoritative on its own.
    pub(crate) last: Atomic<Node<T>>,

    /// Consumer-side watermark: the most recently dequeued node. Null
    /// means nothing dequeued yet; PICKET means closed from the consumer
    /// side. This is a lookup hint only — once a slot closes it is
    /// overwritten with PICKET and no longer names a real node, so it
    /// cannot be used to tell which nodes still hold live values. See
    /// `removed_version` for that.
    pub(crate) removed: CachePadded<Atomic<Node<T>>>,

    /// The ticket of the last node actually dequeued from this slot, kept
    /// independently of `removed` so it survives the slot being closed.
    /// `NOTHING_REMOVED` if nothing has been dequeued yet. `drop` uses
    /// this, not `removed`, to decide which node payloads were already
    /// taken.
    pub(crate) removed_version: CachePadded<AtomicI64>,
}

impl<T> Slot<T> {
    pub(crate) fn empty() -> Self {
        Slot {
            head: CachePadded::new(Atomic::null()),
            last: Atomic::null(),
            removed: CachePadded::new(Atomic::null()),
            removed_version: CachePadded::new(AtomicI64::new(NOTHING_REMOVED)),
        }
    }
}
