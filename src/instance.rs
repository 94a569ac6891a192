use std::array;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use crossbeam_epoch::Shared;

use crate::node::{is_picket, Node};
use crate::slot::Slot;

/// The immutable-in-identity shell holding one generation of the queue:
/// the fixed-size array of slots and the two ticket counters. Once
/// `invalid` becomes true it never becomes false again, and the top level
/// (`SpQueue`) replaces the whole instance rather than repairing it.
pub(crate) struct QueueInstance<T, const W: usize> {
    pub(crate) invalid: AtomicBool,
    pub(crate) tail: AtomicI64,
    pub(crate) cnt_deq: AtomicI64,
    pub(crate) slots: [Slot<T>; W],
}

impl<T, const W: usize> QueueInstance<T, W> {
    /// A fresh, empty instance: `tail = 0`, `cnt_deq = 0`, `invalid = false`.
    pub(crate) fn empty() -> Self {
        Self::with_tail(0)
    }

    /// An instance pre-seeded with `node` at `slots[0]`, ticket 0. Used by
    /// the replacement protocol so the pending enqueue that triggered the
    /// rebuild doesn't have to round-trip through a second retry.
    pub(crate) fn seeded<'g>(node: Shared<'g, Node<T>>) -> Self {
        debug_assert!(!is_picket(node) && !node.is_null());
        let instance = Self::with_tail(1);
        instance.slots[0].head.store(node, Ordering::Relaxed);
        instance.slots[0].last.store(node, Ordering::Relaxed);
        instance
    }

    fn with_tail(tail: i64) -> Self {
        QueueInstance {
            invalid: AtomicBool::new(false),
            tail: AtomicI64::new(tail),
            cnt_deq: AtomicI64::new(0),
            slots: array::from_fn(|_| Slot::empty()),
        }
    }
}

impl<T, const W: usize> Drop for QueueInstance<T, W> {
    /// Frees every node still linked into any slot's chain.
    ///
    /// This only runs once the instance itself has been retired by the
    /// epoch reclaimer, i.e. once no thread can still be walking one of
    /// these chains, so the traversal below needs no protection. A node's
    /// payload is only dropped if it was never handed out by `dequeue`:
    /// slots track this with `removed_version`, since the chain is never
    /// physically unlinked while the instance is live (`dequeue` moves the
    /// payload out but leaves the node in place). `removed_version` is
    /// read here rather than derived from the `removed` pointer, because
    /// closing a slot overwrites `removed` with PICKET and would otherwise
    /// make every node in a closed slot look consumed, leaking whatever
    /// values were never dequeued before the close.
    fn drop(&mut self) {
        let guard = unsafe { crossbeam_epoch::unprotected() };
        for slot in self.slots.iter() {
            let removed_version = slot.removed_version.load(Ordering::Relaxed);

            let mut cur = slot.head.load(Ordering::Relaxed, guard);
            while !is_picket(cur) && !cur.is_null() {
                let owned = unsafe { cur.into_owned() };
                let next = owned.next.load(Ordering::Relaxed, guard);
                let mut boxed = owned.into_box();
                if boxed.version > removed_version {
                    unsafe { boxed.drop_value_in_place() };
                }
                drop(boxed);
                cur = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crossbeam_epoch::Owned;

    #[test]
    fn empty_instance_starts_at_tail_zero() {
        let instance = QueueInstance::<i32, 4>::empty();
        assert_eq!(instance.tail.load(Ordering::Relaxed), 0);
        assert_eq!(instance.cnt_deq.load(Ordering::Relaxed), 0);
        assert!(!instance.invalid.load(Ordering::Relaxed));
    }

    #[test]
    fn seeded_instance_starts_at_tail_one() {
        let guard = unsafe { crossbeam_epoch::unprotected() };
        let node = Owned::new(Node::new(7, 0)).into_shared(guard);
        let instance = QueueInstance::<i32, 4>::seeded(node);
        assert_eq!(instance.tail.load(Ordering::Relaxed), 1);
        let head = instance.slots[0].head.load(Ordering::Relaxed, guard);
        assert_eq!(unsafe { head.deref().version }, 0);
    }
}
