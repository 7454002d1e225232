//! Listener handles and the failure values produced during dispatch.

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;

/// Failure raised by a single listener during one dispatch pass.
///
/// A listener can fail in two ways: by returning an `Err`, or by panicking.
/// Both are caught at the dispatch site and forwarded to the bus's error
/// handler; neither surfaces to the caller of `emit`.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Listener returned an error value.
    #[error("{0}")]
    Failure(#[from] anyhow::Error),

    /// Listener panicked. The string is the panic payload when it was a
    /// `&str` or `String`, otherwise a fixed fallback description.
    #[error("{0}")]
    Panic(String),
}

/// Opaque identity of a listener registration.
///
/// Two [`Listener`] handles compare equal exactly when one is a clone of the
/// other. Identity is the `Arc` allocation backing the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// A subscription handle wrapping an event callback.
///
/// `Listener` is a cheap clonable handle: clones refer to the same underlying
/// callback and count as the same listener for registration and removal.
/// A handle may be registered under multiple event names and on multiple
/// buses; the bus holds cloned handles scoped to "still subscribed".
pub struct Listener<P> {
    callback: Arc<dyn Fn(&P) -> Result<()> + Send + Sync>,
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<P> Listener<P> {
    /// Wraps a callback in a listener handle.
    ///
    /// Every call produces a distinct listener identity, even for identical
    /// closures. Keep the handle (or a clone) around if you intend to remove
    /// the subscription later.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Returns the identity of this handle.
    pub fn id(&self) -> ListenerId {
        // Cast to a thin pointer: identity is the ArcInner allocation, which
        // is distinct per `Arc::new` even for zero-sized closures.
        ListenerId(Arc::as_ptr(&self.callback) as *const () as usize)
    }

    /// Invokes the callback once, converting both `Err` returns and panics
    /// into a [`ListenerError`].
    pub(crate) fn invoke(&self, payload: &P) -> Result<(), ListenerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.callback)(payload))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ListenerError::Failure(e)),
            Err(cause) => Err(ListenerError::Panic(panic_message(cause))),
        }
    }
}

impl<P> std::fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Listener").field(&self.id()).finish()
    }
}

/// Extracts a human-readable message from a panic payload.
fn panic_message(cause: Box<dyn Any + Send>) -> String {
    if let Some(s) = cause.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "listener panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let listener: Listener<()> = Listener::new(|_| Ok(()));
        let clone = listener.clone();
        assert_eq!(listener.id(), clone.id());
    }

    #[test]
    fn distinct_handles_have_distinct_identity() {
        let a: Listener<()> = Listener::new(|_| Ok(()));
        let b: Listener<()> = Listener::new(|_| Ok(()));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn invoke_maps_err_to_failure() {
        let listener: Listener<()> = Listener::new(|_| Err(anyhow::anyhow!("Test error")));
        let err = listener.invoke(&()).unwrap_err();
        assert!(matches!(err, ListenerError::Failure(_)));
        assert_eq!(err.to_string(), "Test error");
    }

    #[test]
    fn invoke_maps_str_panic_to_panic_message() {
        let listener: Listener<()> = Listener::new(|_| panic!("String error"));
        let err = listener.invoke(&()).unwrap_err();
        assert!(matches!(err, ListenerError::Panic(_)));
        assert_eq!(err.to_string(), "String error");
    }

    #[test]
    fn invoke_maps_non_string_panic_to_fallback_message() {
        struct Opaque;
        let listener: Listener<()> = Listener::new(|_| std::panic::panic_any(Opaque));
        let err = listener.invoke(&()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "listener panicked with a non-string payload"
        );
    }
}
