//! Event bus and listener types.
//!
//! The bus is payload-agnostic: it carries one payload type `P` chosen by the
//! host, typically a tagged enum covering the host's event vocabulary. Which
//! payload variants travel under which event names is the host's contract,
//! enforced at the `on`/`emit` boundary rather than inside the registry.

pub mod event_bus;
pub mod listener;

pub use event_bus::ErrorHandler;
pub use event_bus::EventBus;
pub use listener::Listener;
pub use listener::ListenerError;
pub use listener::ListenerId;
