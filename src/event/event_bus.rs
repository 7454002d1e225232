//! The event bus: registry plus synchronous fan-out dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::event::listener::Listener;
use crate::event::listener::ListenerError;
use crate::subscriber::Subscriber;

/// Error-handling policy invoked once per listener failure.
pub type ErrorHandler = Box<dyn Fn(&str, &ListenerError) + Send + Sync>;

type Registry<P> = RwLock<HashMap<String, Vec<Listener<P>>>>;

/// In-process publish/subscribe bus keyed by event name.
///
/// The bus maps string event names to the listeners currently registered for
/// them and dispatches each emitted payload to every such listener, in
/// registration order. Listener failures are isolated: an `Err` return or a
/// panic in one listener is forwarded to the bus's error handler and dispatch
/// continues with the next listener. None of the four operations ever fails.
///
/// The payload type `P` is opaque to the bus; per-event payload shape is the
/// caller's contract. All operations take `&self`, so a bus shared behind an
/// `Arc` can be used from multiple threads; the registry lock is never held
/// across a listener invocation.
pub struct EventBus<P> {
    listeners: Registry<P>,
    error_handler: ErrorHandler,
}

impl<P> EventBus<P> {
    /// Creates a bus with the default error policy: each listener failure is
    /// logged as `Error in listener for event "<name>": <message>`.
    pub fn new() -> Self {
        Self::with_error_handler(|event_name, error| {
            log::error!("{}", listener_error_report(event_name, error));
        })
    }

    /// Creates a bus with a custom error policy, fully replacing the default
    /// (the default's log line is never also produced).
    pub fn with_error_handler<H>(handler: H) -> Self
    where
        H: Fn(&str, &ListenerError) + Send + Sync + 'static,
    {
        Self {
            listeners: RwLock::new(HashMap::new()),
            error_handler: Box::new(handler),
        }
    }

    /// Registers `listener` under `event_name`.
    ///
    /// Registering a clone of an already-registered handle is an idempotent
    /// no-op. Returns the bus for chaining.
    pub fn on(&self, event_name: impl Into<String>, listener: Listener<P>) -> &Self {
        let mut registry = self.listeners.write().unwrap();
        let entry = registry.entry(event_name.into()).or_default();
        if !entry.iter().any(|l| l.id() == listener.id()) {
            entry.push(listener);
        }
        self
    }

    /// Wraps `subscriber` in a listener handle and registers it under
    /// `event_name`.
    ///
    /// Returns the handle so the caller can [`off`](Self::off) it later.
    pub fn subscribe<S>(&self, event_name: impl Into<String>, subscriber: Arc<S>) -> Listener<P>
    where
        S: Subscriber<P> + 'static,
    {
        let listener = Listener::new(move |payload: &P| subscriber.callback(payload));
        self.on(event_name, listener.clone());
        listener
    }

    /// Dispatches `payload` to every listener registered under `event_name`.
    ///
    /// Unknown names are a no-op. The set of listeners is snapshotted when
    /// iteration begins; registrations made by a listener during the pass are
    /// not visited in that pass, and removals do not unvisit. Each invocation
    /// is individually guarded, so a failing listener never prevents the
    /// remaining ones from running and nothing propagates out of `emit`.
    pub fn emit(&self, event_name: &str, payload: &P) -> &Self {
        let snapshot: Vec<Listener<P>> = {
            let registry = self.listeners.read().unwrap();
            match registry.get(event_name) {
                Some(entry) => entry.clone(),
                None => return self,
            }
        };

        for listener in &snapshot {
            if let Err(error) = listener.invoke(payload) {
                (self.error_handler)(event_name, &error);
            }
        }
        self
    }

    /// Removes `listener` from `event_name`'s set.
    ///
    /// Unknown names and unregistered handles are silent no-ops. The entry is
    /// dropped entirely when its last listener is removed, so the registry
    /// never retains empty sets. Returns the bus for chaining.
    pub fn off(&self, event_name: &str, listener: &Listener<P>) -> &Self {
        let mut registry = self.listeners.write().unwrap();
        if let Some(entry) = registry.get_mut(event_name) {
            entry.retain(|l| l.id() != listener.id());
            if entry.is_empty() {
                registry.remove(event_name);
            }
        }
        self
    }

    /// Returns the number of listeners currently registered under
    /// `event_name`, `0` when the name has no entry.
    pub fn listener_count(&self, event_name: &str) -> usize {
        let registry = self.listeners.read().unwrap();
        registry.get(event_name).map_or(0, |entry| entry.len())
    }

    /// Returns the number of event names with at least one listener.
    pub fn event_count(&self) -> usize {
        self.listeners.read().unwrap().len()
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats the default error policy's report line.
pub(crate) fn listener_error_report(event_name: &str, error: &ListenerError) -> String {
    format!("Error in listener for event \"{event_name}\": {error}")
}
