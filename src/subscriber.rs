//! Event subscribers and the capabilities they advertise.
//!
//! A [`Subscriber<E>`] receives one event kind `E`. A [`Listener`] is any
//! object that can be broadcast-registered on a
//! [`DispatchRegistry`](crate::dispatch::DispatchRegistry): it hands out one
//! subscriber handle per event kind it supports through [`Capabilities`].
//! The [`listener!`](crate::listener) macro writes the `Listener` impl.

pub mod connection_log_subscriber;

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::event::Event;

/// Trait for event subscribers.
pub trait Subscriber<E>: Send + Sync + 'static {
    /// Called when an event of type E is fired.
    ///
    /// Errors and panics are caught by the dispatch unit and logged; they
    /// never reach the code that fired the event.
    fn callback(&self, event: &E) -> Result<()>;

    /// Name used when reporting delivery failures.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Declares a subscriber capability: the event kind it receives and the name
/// of its handling operation.
///
/// Usually implemented on the trait object of a per-kind listener trait,
/// for example `impl Capability for dyn ConnectListener`.
pub trait Capability {
    type Event: Event;

    /// Name of the capability, as reported in registration errors.
    const NAME: &'static str;

    /// Name of the handling operation every subscriber of this capability has.
    const HANDLER: &'static str;
}

/// Object that can be registered on every dispatch unit it qualifies for.
pub trait Listener: Send + Sync + 'static {
    /// Returns one subscriber handle per event kind this listener accepts.
    fn capabilities(self: Arc<Self>) -> Capabilities;

    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Set of subscriber handles, keyed by event kind.
///
/// Each entry holds an `Arc<dyn Subscriber<E>>` behind `dyn Any`, so a
/// dispatch unit for `E` can ask whether the capability is present by
/// downcasting.
#[derive(Default)]
pub struct Capabilities {
    handles: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Adds the subscriber handle for event kind `E`, replacing any previous one.
    pub fn provide<E: Event>(&mut self, subscriber: Arc<dyn Subscriber<E>>) -> &mut Self {
        self.handles.insert(TypeId::of::<E>(), Box::new(subscriber));
        self
    }

    /// Returns the subscriber handle for `E`, if provided.
    pub fn get<E: Event>(&self) -> Option<Arc<dyn Subscriber<E>>> {
        self.handles
            .get(&TypeId::of::<E>())
            .and_then(|handle| handle.downcast_ref::<Arc<dyn Subscriber<E>>>())
            .cloned()
    }

    pub fn satisfies<E: Event>(&self) -> bool {
        self.handles.contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
