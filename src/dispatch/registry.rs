use std::any::TypeId;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use derive_builder::Builder;
use log::debug;

use crate::dispatch::Dispatch;
use crate::dispatch::FireReport;
use crate::error::DispatchError;
use crate::event::Event;
use crate::subscriber::Listener;

/// Behaviour switches for a [`DispatchRegistry`].
#[derive(Builder, Clone, Debug, Default)]
#[builder(pattern = "immutable")]
pub struct RegistryOptions {
    /// Report unmatched fires and registrations as errors instead of
    /// dropping them.
    #[builder(default)]
    pub strict: bool,
}

/// Ordered collection of dispatch units.
///
/// Units are appended by [`DispatchUnit::new`](crate::dispatch::DispatchUnit::new)
/// and are consulted in that order. When two units declare the same event
/// kind, only the first one ever receives fired events.
pub struct DispatchRegistry {
    units: RwLock<Vec<Arc<dyn Dispatch>>>,
    options: RegistryOptions,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            units: RwLock::new(Vec::new()),
            options,
        }
    }

    pub(crate) fn add(&self, unit: Arc<dyn Dispatch>) {
        self.units
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(unit);
    }

    /// Registers `listener` on every unit whose capability it satisfies.
    ///
    /// Returns the number of units the listener was registered on.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`DispatchError::NoMatchingUnit`] if no unit
    /// accepts the listener. Otherwise no match is not an error.
    pub fn register_all(&self, listener: Arc<dyn Listener>) -> Result<usize, DispatchError> {
        let name = listener.name();
        let capabilities = listener.capabilities();

        let mut joined = 0;
        for unit in self.snapshot() {
            if unit.accepts(&capabilities) {
                unit.attach(&capabilities, &name)?;
                joined += 1;
            }
        }

        if joined == 0 {
            if self.options.strict {
                return Err(DispatchError::NoMatchingUnit { listener: name });
            }
            debug!("Listener {} matched no dispatch unit", name);
        }
        Ok(joined)
    }

    /// Fires `event` on the first unit declared for its exact kind.
    ///
    /// Returns `Ok(None)` if no unit handles the event.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`DispatchError::UnhandledEvent`] instead of
    /// `Ok(None)`.
    pub fn fire(&self, event: &dyn Event) -> Result<Option<FireReport>, DispatchError> {
        let unit = self.snapshot().into_iter().find(|unit| unit.handles(event));

        match unit {
            Some(unit) => unit.fire_dyn(event).map(Some),
            None if self.options.strict => Err(DispatchError::UnhandledEvent {
                event: event.event_name(),
            }),
            None => {
                debug!("Dropping event {}: no dispatch unit", event.event_name());
                Ok(None)
            }
        }
    }

    /// Whether some unit is declared for event kind `E`.
    pub fn handles<E: Event>(&self) -> bool {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|unit| unit.event_kind() == TypeId::of::<E>())
    }

    /// Event names of all units, in consultation order.
    pub fn event_names(&self) -> Vec<String> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|unit| unit.event_name().to_string())
            .collect()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<dyn Dispatch>> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for DispatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use anyhow::Result;

    use super::*;
    use crate::dispatch::DispatchUnit;
    use crate::subscriber::Capability;
    use crate::subscriber::Subscriber;

    struct Started;

    impl Event for Started {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Stopped;

    impl Event for Stopped {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct StartedCapability;

    impl Capability for StartedCapability {
        type Event = Started;
        const NAME: &'static str = "StartedListener";
        const HANDLER: &'static str = "on_started";
    }

    struct StoppedCapability;

    impl Capability for StoppedCapability {
        type Event = Stopped;
        const NAME: &'static str = "StoppedListener";
        const HANDLER: &'static str = "on_stopped";
    }

    struct Unknown;

    impl Event for Unknown {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct Tally {
        started: AtomicUsize,
        stopped: AtomicUsize,
    }

    impl Subscriber<Started> for Tally {
        fn callback(&self, _event: &Started) -> Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl Subscriber<Stopped> for Tally {
        fn callback(&self, _event: &Stopped) -> Result<()> {
            self.stopped.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    crate::listener!(Tally: Started, Stopped);

    #[derive(Default)]
    struct StartOnly {
        started: AtomicUsize,
    }

    impl Subscriber<Started> for StartOnly {
        fn callback(&self, _event: &Started) -> Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    crate::listener!(StartOnly: Started);

    fn registry(options: RegistryOptions) -> DispatchRegistry {
        let registry = DispatchRegistry::with_options(options);
        DispatchUnit::new::<StartedCapability>("on_started", &registry).unwrap();
        DispatchUnit::new::<StoppedCapability>("on_stopped", &registry).unwrap();
        registry
    }

    #[test]
    fn test_units_are_appended_in_order() {
        let registry = registry(RegistryOptions::default());
        let names = registry.event_names();

        assert_eq!(registry.len(), 2);
        assert!(names[0].ends_with("Started"));
        assert!(names[1].ends_with("Stopped"));
        assert!(registry.handles::<Started>());
        assert!(!registry.handles::<Unknown>());
    }

    #[test]
    fn test_register_all_joins_every_matching_unit() {
        let registry = registry(RegistryOptions::default());
        let tally = Arc::new(Tally::default());
        let start_only = Arc::new(StartOnly::default());

        assert_eq!(registry.register_all(tally.clone()).unwrap(), 2);
        assert_eq!(registry.register_all(start_only.clone()).unwrap(), 1);

        registry.fire(&Started).unwrap();
        registry.fire(&Stopped).unwrap();

        assert_eq!(tally.started.load(Ordering::SeqCst), 1);
        assert_eq!(tally.stopped.load(Ordering::SeqCst), 1);
        assert_eq!(start_only.started.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fire_routes_to_first_matching_unit_only() {
        let registry = DispatchRegistry::new();
        let first = DispatchUnit::new::<StartedCapability>("on_started", &registry).unwrap();
        let second = DispatchUnit::new::<StartedCapability>("on_started", &registry).unwrap();

        let tally = Arc::new(Tally::default());
        first.register(tally.clone());
        second.register(tally.clone());

        let report = registry.fire(&Started).unwrap().unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(tally.started.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unmatched_fire_is_dropped() {
        let registry = registry(RegistryOptions::default());
        assert!(registry.fire(&Unknown).unwrap().is_none());
    }

    #[test]
    fn test_unmatched_register_all_is_noop() {
        let registry = DispatchRegistry::new();
        DispatchUnit::new::<StoppedCapability>("on_stopped", &registry).unwrap();

        assert_eq!(registry.register_all(Arc::new(StartOnly::default())).unwrap(), 0);
    }

    #[test]
    fn test_strict_mode_reports_unmatched() {
        let options = RegistryOptionsBuilder::default()
            .strict(true)
            .build()
            .unwrap();
        let registry = DispatchRegistry::with_options(options);
        DispatchUnit::new::<StoppedCapability>("on_stopped", &registry).unwrap();

        assert!(matches!(
            registry.fire(&Unknown),
            Err(DispatchError::UnhandledEvent { .. })
        ));
        assert!(matches!(
            registry.register_all(Arc::new(StartOnly::default())),
            Err(DispatchError::NoMatchingUnit { .. })
        ));
        assert!(registry.fire(&Stopped).unwrap().is_some());
    }
}
