//! Observer registration for change signals.
//!
//! [`SignalHub`] keeps the listener registry; [`Subscription`] is the
//! disposable handle returned by every registration. Dropping the handle
//! unregisters the listener, so listener lifetime follows ordinary Rust
//! ownership instead of ambient event wiring.

mod hub;
mod subscription;

pub use hub::{SignalHub, SubscriptionId};
pub use subscription::Subscription;
