use std::marker::PhantomData;

use crate::queue::SpQueue;
use crate::traits::{DefaultTraits, QueueTraits};
use crate::DEFAULT_WIDTH;

/// Builds an [`SpQueue`] with a non-default [`QueueTraits`] bundle without
/// having to spell out the full generic signature at the call site.
///
/// ```
/// use spqueue::{SpQueueBuilder, DefaultTraits};
///
/// let queue = SpQueueBuilder::<i32>::new().build();
/// queue.push(1);
/// assert_eq!(queue.pop(), Some(1));
/// ```
pub struct SpQueueBuilder<T, const W: usize = DEFAULT_WIDTH, Tr: QueueTraits<T> = DefaultTraits> {
    _marker: PhantomData<fn() -> (T, Tr, [(); W])>,
}

impl<T, const W: usize, Tr: QueueTraits<T>> SpQueueBuilder<T, W, Tr> {
    pub fn new() -> Self {
        SpQueueBuilder {
            _marker: PhantomData,
        }
    }

    /// Switches the trait bundle this builder will construct, e.g. to
    /// swap in a `QueueStats`-backed configuration for `size()`-sensitive
    /// deployments.
    pub fn with_traits<Tr2: QueueTraits<T>>(self) -> SpQueueBuilder<T, W, Tr2> {
        SpQueueBuilder::new()
    }

    pub fn build(self) -> SpQueue<T, W, Tr> {
        SpQueue::new()
    }
}

impl<T, const W: usize, Tr: QueueTraits<T>> Default for SpQueueBuilder<T, W, Tr> {
    fn default() -> Self {
        Self::new()
    }
}
