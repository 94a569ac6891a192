//! A lock-free multi-producer / multi-consumer FIFO queue implementing
//! the *speculative pairing queue* algorithm (Henzinger, Payer, Sezgin,
//! 2013: "Replacing competition with cooperation to achieve scalable
//! lock-free FIFO queues").
//!
//! Instead of having every producer and consumer race over a single head
//! or tail pointer, the queue stripes itself across a small fixed-width
//! array of per-slot chains (`W` slots, default 10). A producer claims a
//! ticket from a `tail` counter, a consumer claims a ticket from a
//! `cnt_deq` counter, and both map their ticket to `ticket % W` to find
//! the slot they must publish into or drain from. When a slot can't serve
//! the ticket it was assigned — because a racing consumer outran the
//! producers, or vice versa — the whole queue is marked invalid and
//! atomically swapped for a freshly built instance, carrying the pending
//! operation's value along so the swap costs no extra round-trip.
//!
//! ```
//! use spqueue::SpQueue;
//! use std::thread;
//!
//! let queue = SpQueue::<i32>::new();
//! thread::scope(|scope| {
//!     scope.spawn(|| {
//!         for i in 0..100 {
//!             queue.enqueue(i);
//!         }
//!     });
//! });
//!
//! let mut drained = Vec::new();
//! while let Some(v) = queue.dequeue() {
//!     drained.push(v);
//! }
//! assert_eq!(drained, (0..100).collect::<Vec<_>>());
//! ```

mod backoff;
mod builder;
mod counter;
mod error;
mod instance;
mod node;
mod queue;
mod reclaim;
mod slot;
mod stats;
mod traits;

pub use backoff::{Backoff, CrossbeamBackoff, NoBackoff, SpinBackoff};
pub use builder::SpQueueBuilder;
pub use counter::{AtomicAdaptiveCounter, ItemCounter, NullCounter};
pub use error::SpQueueError;
pub use node::{DefaultAdapter, NodeAdapter};
pub use queue::{SpQueue, DEFAULT_WIDTH};
pub use reclaim::{EpochReclaimer, Reclaimer};
pub use stats::{NullStats, QueueStats, Stats, StatsSnapshot};
pub use traits::{DefaultTraits, QueueTraits};
