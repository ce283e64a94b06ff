//! Shared building blocks: listener registries and method/event name registry.

pub mod events;
pub mod methods;

pub use events::{EventHub, Listener, Sender, Subscription, SubscriptionId};
