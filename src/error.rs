/// Errors the core surfaces to a caller.
///
/// This is deliberately small: `enqueue` never fails for lack of space and
/// out-of-memory is left to the allocator (as is standard across the
/// ecosystem), so the only contract violation this crate can catch in
/// software is a caller re-enqueuing a node that is still linked
/// elsewhere. By default that is a debug-mode `debug_assert!` abort; this
/// type exists for the `fallible-link-check` feature, which turns the
/// same check into a catchable `Result` instead of a process abort.
#[derive(thiserror::Error, Debug)]
pub enum SpQueueError {
    #[error("node re-enqueued while still linked into another chain")]
    NodeStillLinked,
}
