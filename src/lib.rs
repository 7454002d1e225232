//! event-bus - An in-process publish/subscribe primitive.
//!
//! This crate provides a small, payload-agnostic event bus with:
//! - Multiple listeners per string event name, with set semantics
//! - Per-listener error isolation during fan-out (errors and panics)
//! - A pluggable per-instance error-handling policy
//!
//! The bus itself is synchronous and has no I/O surface; its only boundary is
//! the in-process `on`/`emit`/`off`/`listener_count` API.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod subscriber;

pub use event::EventBus;
pub use event::Listener;
pub use event::ListenerError;
pub use subscriber::Subscriber;
