//! Subscriber trait for struct-based event listeners.

use anyhow::Result;

/// Trait for types that react to published payloads.
///
/// Implement this on a struct when a listener needs its own state or
/// collaborators; register it with [`EventBus::subscribe`], which wraps the
/// callback in a removable [`Listener`] handle.
///
/// [`EventBus::subscribe`]: crate::event::EventBus::subscribe
/// [`Listener`]: crate::event::Listener
pub trait Subscriber<P>: Send + Sync {
    /// Called once per payload dispatched to this subscriber.
    ///
    /// Returning an `Err` routes the failure to the owning bus's error
    /// handler; it never aborts the rest of the dispatch pass.
    fn callback(&self, payload: &P) -> Result<()>;
}
