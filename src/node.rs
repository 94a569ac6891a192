use std::mem::MaybeUninit;
use std::sync::atomic::Ordering;

use crossbeam_epoch::{Atomic, Guard, Owned, Shared};

/// Tag bit that marks a `next`/`head` pointer slot as PICKET rather than a
/// real node.
///
/// PICKET is a distinguished sentinel that closes a slot (see
/// [`crate::SpQueue`]'s internal `close`), not a payload. Rather than
/// allocating a per-queue sentinel node and comparing by address, this
/// crate tags a null pointer: the slot holds the same empty address it
/// would for "nothing here yet", but with the low tag bit set. This
/// sidesteps giving PICKET an allocation to reclaim at all.
pub(crate) const PICKET_TAG: usize = 1;

/// A node queued into one slot's chain.
///
/// `version` is the ticket the node was published at; it is written once,
/// before the node's pointer is made visible via a release CAS, and never
/// mutated afterwards.
pub struct Node<T> {
    value: MaybeUninit<T>,
    pub(crate) version: i64,
    pub(crate) next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, version: i64) -> Self {
        Node {
            value: MaybeUninit::new(value),
            version,
            next: Atomic::null(),
        }
    }

    /// Takes ownership of the payload out of the node.
    ///
    /// # Safety
    /// Must be called at most once per node, and only after the caller has
    /// established (via the dequeue ticket protocol) exclusive rights to
    /// this node's value.
    pub(crate) unsafe fn take_value(&self) -> T {
        self.value.as_ptr().read()
    }

    /// Drops the payload in place without deallocating the node.
    ///
    /// # Safety
    /// Must only be called on a node whose value was never taken via
    /// [`Node::take_value`].
    pub(crate) unsafe fn drop_value_in_place(&mut self) {
        self.value.as_mut_ptr().drop_in_place();
    }

    pub(crate) fn next_is_unset(&self, guard: &Guard) -> bool {
        is_empty_slot(self.next.load(Ordering::Relaxed, guard))
    }
}

/// Returns a `Shared` that represents the PICKET sentinel: a tagged null
/// pointer, not a real allocation.
pub(crate) fn picket<'g, T>() -> Shared<'g, Node<T>> {
    Shared::null().with_tag(PICKET_TAG)
}

/// True if `shared` is the PICKET sentinel.
pub(crate) fn is_picket<T>(shared: Shared<'_, Node<T>>) -> bool {
    shared.tag() == PICKET_TAG
}

/// True if `shared` is a genuinely empty slot (untagged null), as opposed
/// to PICKET or a real node. Crossbeam's `Shared::is_null` ignores tag
/// bits, so it alone cannot tell PICKET and "nothing here" apart.
pub(crate) fn is_empty_slot<T>(shared: Shared<'_, Node<T>>) -> bool {
    shared.tag() != PICKET_TAG && shared.is_null()
}

/// Converts a caller's payload into a queued [`Node`] and back.
///
/// Two pure conversions plus a link-checker that guards against
/// re-enqueuing a node that is still linked elsewhere. The default adapter
/// is non-intrusive (it boxes the payload itself, rather than assuming the
/// payload embeds a node), since Rust has no portable member-offset hook
/// for an intrusive variant.
pub trait NodeAdapter<T> {
    /// Wraps `value` into an owned node stamped with `version`.
    fn to_node(value: T, version: i64) -> Owned<Node<T>> {
        Owned::new(Node::new(value, version))
    }

    /// Takes ownership of the payload stored in `node`.
    ///
    /// # Safety
    /// See [`Node::take_value`].
    unsafe fn to_value(node: &Node<T>) -> T {
        node.take_value()
    }

    /// Debug-mode contract check: the node must not already be linked into
    /// another chain. Violating this indicates the caller re-enqueued an
    /// item that the queue (or another collection) still owns.
    fn check_unlinked(node: &Node<T>, guard: &Guard) {
        debug_assert!(
            node.next_is_unset(guard),
            "spqueue: node re-enqueued while still linked into another chain"
        );
    }
}

/// The default, non-intrusive node adapter: every enqueue allocates a
/// fresh boxed node around the payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAdapter;

impl<T> NodeAdapter<T> for DefaultAdapter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picket_is_tagged_null() {
        let p = picket::<i32>();
        assert!(is_picket(p));
        assert!(p.is_null());
        assert!(!is_empty_slot(p));
    }

    #[test]
    fn untagged_null_is_empty_slot_not_picket() {
        let n: Shared<'_, Node<i32>> = Shared::null();
        assert!(is_empty_slot(n));
        assert!(!is_picket(n));
    }

    #[test]
    fn take_value_reads_without_double_drop() {
        let node = Node::new(String::from("hi"), 0);
        let taken = unsafe { node.take_value() };
        assert_eq!(taken, "hi");
        std::mem::forget(node);
    }
}
