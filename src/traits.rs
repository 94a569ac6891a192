use crate::backoff::{Backoff, CrossbeamBackoff};
use crate::counter::{AtomicAdaptiveCounter, ItemCounter};
use crate::node::{DefaultAdapter, NodeAdapter};
use crate::stats::{NullStats, Stats};

/// Bundles the small set of collaborators `SpQueue` is parametric over: a
/// node adapter, a statistics sink, a back-off strategy, and an item
/// counter. Expressed as associated types rather than a bag of separate
/// generic parameters, picked up by `SpQueue`'s generic parameter at
/// compile time (so there is no dynamic dispatch on the hot path).
pub trait QueueTraits<T>: Sized {
    type Adapter: NodeAdapter<T>;
    type Stats: Stats + Sync;
    type Backoff: Backoff;
    type Counter: ItemCounter + Sync;
}

/// The out-of-the-box configuration: a non-intrusive node adapter, no
/// statistics collection, a spin-then-yield back-off, and a relaxed
/// atomic item counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTraits;

impl<T> QueueTraits<T> for DefaultTraits {
    type Adapter = DefaultAdapter;
    type Stats = NullStats;
    type Backoff = CrossbeamBackoff;
    type Counter = AtomicAdaptiveCounter;
}
