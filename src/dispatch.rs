//! Dispatch units and the registry that routes events to them.
//!
//! ```text
//! DispatchRegistry ──► [unit ConnectEvent] ──► sub1.callback() ─► sub2.callback()
//!                  └─► [unit DisconnectEvent] ──► sub1.callback()
//! ```
//!
//! Firing is synchronous. Every subscriber of the matching unit is attempted
//! in registration order before `fire` returns.

use std::any::TypeId;

use crate::error::DispatchError;
use crate::event::Event;
use crate::subscriber::Capabilities;

pub mod registry;
pub mod unit;

pub use registry::DispatchRegistry;
pub use registry::RegistryOptions;
pub use registry::RegistryOptionsBuilder;
pub use unit::DispatchUnit;

/// Outcome of firing one event on a dispatch unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireReport {
    /// Name of the fired event kind.
    pub event: String,
    /// Subscribers invoked, successful or not.
    pub attempted: usize,
    /// Subscribers whose callback returned an error or panicked.
    pub failed: usize,
}

impl FireReport {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            attempted: 0,
            failed: 0,
        }
    }

    /// Subscribers that returned normally, saturating at zero.
    pub fn delivered(&self) -> usize {
        self.attempted.saturating_sub(self.failed)
    }
}

/// Type-erased view of a [`DispatchUnit`], as stored by the registry.
pub trait Dispatch: Send + Sync {
    /// Declared name of the handling operation.
    fn handler_name(&self) -> &str;

    /// Declared name of the subscriber capability.
    fn capability_name(&self) -> &str;

    fn event_kind(&self) -> TypeId;

    fn event_name(&self) -> &str;

    /// Whether the given capabilities satisfy this unit.
    fn accepts(&self, capabilities: &Capabilities) -> bool;

    /// Registers the matching handle from `capabilities`.
    fn attach(&self, capabilities: &Capabilities, listener: &str) -> Result<(), DispatchError>;

    /// Whether `event` is exactly this unit's kind.
    fn handles(&self, event: &dyn Event) -> bool;

    fn fire_dyn(&self, event: &dyn Event) -> Result<FireReport, DispatchError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
