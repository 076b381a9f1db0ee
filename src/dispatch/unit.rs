use std::any::Any;
use std::any::TypeId;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use log::debug;
use log::warn;

use crate::dispatch::Dispatch;
use crate::dispatch::FireReport;
use crate::dispatch::registry::DispatchRegistry;
use crate::error::DispatchError;
use crate::event::Event;
use crate::subscriber::Capabilities;
use crate::subscriber::Capability;
use crate::subscriber::Listener;
use crate::subscriber::Subscriber;

type Subscribers<E> = RwLock<Vec<Arc<dyn Subscriber<E>>>>;

/// Dispatch unit for a single event kind `E`.
///
/// Holds the subscribers registered for `E` in registration order and invokes
/// each of them when an `E` is fired. Subscribers are never removed.
pub struct DispatchUnit<E: Event> {
    handler_name: &'static str,
    capability_name: &'static str,
    subscribers: Subscribers<E>,
}

impl<E: Event> DispatchUnit<E> {
    /// Creates a new unit for capability `C` and appends it to `registry`.
    ///
    /// `handler_name` is the handling operation the caller expects subscribers
    /// to be invoked through (for example `on_connect`). It must be the
    /// operation `C` declares.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] if `handler_name` is not the
    /// handler of `C`, or if `C` itself declares an invalid handler or an
    /// empty name. The registry is left untouched in that case.
    pub fn new<C>(
        handler_name: &str,
        registry: &DispatchRegistry,
    ) -> Result<Arc<Self>, DispatchError>
    where
        C: Capability<Event = E> + ?Sized,
    {
        let unit = Arc::new(Self::detached::<C>(handler_name)?);
        registry.add(unit.clone());

        debug!("Dispatch unit for {} registered", unit.event_name());
        Ok(unit)
    }

    /// Creates a unit that is not part of any registry.
    ///
    /// Subscribers can still be registered and events fired on it directly.
    pub fn detached<C>(handler_name: &str) -> Result<Self, DispatchError>
    where
        C: Capability<Event = E> + ?Sized,
    {
        if C::NAME.trim().is_empty() {
            return Err(DispatchError::Configuration {
                msg: format!("Missing subscriber capability for {}", std::any::type_name::<E>()),
            });
        }
        if !is_identifier(C::HANDLER) {
            return Err(DispatchError::Configuration {
                msg: format!("{} declares invalid handler \"{}\"", C::NAME, C::HANDLER),
            });
        }
        if handler_name != C::HANDLER {
            return Err(DispatchError::Configuration {
                msg: format!(
                    "{} has no handler \"{}\" for {} (expected \"{}\")",
                    C::NAME,
                    handler_name,
                    std::any::type_name::<E>(),
                    C::HANDLER
                ),
            });
        }

        Ok(Self {
            handler_name: C::HANDLER,
            capability_name: C::NAME,
            subscribers: RwLock::new(Vec::new()),
        })
    }

    /// Registers a subscriber to be called whenever `E` is fired.
    ///
    /// The same subscriber may be registered more than once; it is then
    /// called once per registration.
    pub fn register(&self, subscriber: Arc<dyn Subscriber<E>>) -> &Self {
        debug!("Registering {} on {}", subscriber.name(), self.capability_name);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
        self
    }

    /// Registers a listener if it provides this unit's capability.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidSubscriber`] if the listener does not
    /// subscribe to `E`.
    pub fn register_listener(&self, listener: Arc<dyn Listener>) -> Result<&Self, DispatchError> {
        let name = listener.name();
        let capabilities = listener.capabilities();
        self.attach(&capabilities, &name)?;
        Ok(self)
    }

    /// Fires `event`, calling every registered subscriber in registration order.
    ///
    /// Subscribers registered while the fire is running are first called on
    /// the next fire. A subscriber that returns an error or panics is logged
    /// and skipped; the remaining subscribers are still called.
    pub fn fire(&self, event: &E) -> FireReport {
        let subscribers = self.snapshot();
        let mut report = FireReport::new(event.event_name());

        for subscriber in &subscribers {
            report.attempted += 1;
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber.callback(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    report.failed += 1;
                    warn!(
                        "Firing event {} for {} failed: {:#}",
                        report.event,
                        subscriber.name(),
                        e
                    );
                }
                Err(payload) => {
                    report.failed += 1;
                    warn!(
                        "Firing event {} for {} panicked: {}",
                        report.event,
                        subscriber.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        report
    }

    /// Fires a type-erased event.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::WrongEventKind`] unless the concrete type of
    /// `event` is exactly `E`.
    pub fn fire_dyn(&self, event: &dyn Event) -> Result<FireReport, DispatchError> {
        match event.as_any().downcast_ref::<E>() {
            Some(event) => Ok(self.fire(event)),
            None => Err(DispatchError::WrongEventKind {
                expected: self.event_name().to_string(),
                actual: event.event_name(),
            }),
        }
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    pub fn capability_name(&self) -> &'static str {
        self.capability_name
    }

    pub fn event_kind(&self) -> TypeId {
        TypeId::of::<E>()
    }

    pub fn event_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<dyn Subscriber<E>>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<E: Event> Dispatch for DispatchUnit<E> {
    fn handler_name(&self) -> &str {
        DispatchUnit::handler_name(self)
    }

    fn capability_name(&self) -> &str {
        DispatchUnit::capability_name(self)
    }

    fn event_kind(&self) -> TypeId {
        DispatchUnit::event_kind(self)
    }

    fn event_name(&self) -> &str {
        DispatchUnit::event_name(self)
    }

    fn accepts(&self, capabilities: &Capabilities) -> bool {
        capabilities.satisfies::<E>()
    }

    fn attach(&self, capabilities: &Capabilities, listener: &str) -> Result<(), DispatchError> {
        match capabilities.get::<E>() {
            Some(subscriber) => {
                self.register(subscriber);
                Ok(())
            }
            None => Err(DispatchError::InvalidSubscriber {
                expected: self.capability_name.to_string(),
                actual: listener.to_string(),
            }),
        }
    }

    fn handles(&self, event: &dyn Event) -> bool {
        event.as_any().is::<E>()
    }

    fn fire_dyn(&self, event: &dyn Event) -> Result<FireReport, DispatchError> {
        DispatchUnit::fire_dyn(self, event)
    }

    fn len(&self) -> usize {
        DispatchUnit::len(self)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
