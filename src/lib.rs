//! pwr-dispatch - Typed in-process event dispatch.
//!
//! This crate provides synchronous publish/subscribe for a single process:
//! - One [`DispatchUnit`] per event kind, holding its subscribers in order
//! - A [`DispatchRegistry`] routing fired events to the unit for their kind
//! - Broadcast registration of [`Listener`]s on every unit they qualify for
//!
//! Subscriber failures are logged and never reach the code firing the event.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod logging;
pub mod macros;
pub mod subscriber;

pub use dispatch::Dispatch;
pub use dispatch::DispatchRegistry;
pub use dispatch::DispatchUnit;
pub use dispatch::FireReport;
pub use dispatch::RegistryOptions;
pub use error::DispatchError;
pub use event::Event;
pub use subscriber::Capabilities;
pub use subscriber::Capability;
pub use subscriber::Listener;
pub use subscriber::Subscriber;
