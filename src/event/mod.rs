use std::any::Any;
use std::any::TypeId;

pub mod connection;

/// Marker trait for events that can be dispatched through a
/// [`DispatchRegistry`](crate::dispatch::DispatchRegistry).
///
/// Events are plain immutable values. Their concrete Rust type is their
/// kind: units match on it exactly, never on a trait or wrapper type.
pub trait Event: Any + Send + Sync + 'static {
    /// Downcast this event to a concrete type.
    ///
    /// Used internally by dispatch units to recover the concrete event from a
    /// trait object. Most users won't need to call this directly.
    fn as_any(&self) -> &dyn Any;

    /// Get the kind of this event.
    fn event_kind(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Get the name of the event type.
    fn event_name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Event for Ping {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Pong;

    impl Event for Pong {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_event_kind_is_concrete_type() {
        let ping: &dyn Event = &Ping;
        let pong: &dyn Event = &Pong;

        assert_eq!(ping.event_kind(), TypeId::of::<Ping>());
        assert_ne!(ping.event_kind(), pong.event_kind());
        assert!(ping.as_any().is::<Ping>());
        assert!(!pong.as_any().is::<Ping>());
    }

    #[test]
    fn test_event_name_through_trait_object() {
        let ping: &dyn Event = &Ping;
        assert!(ping.event_name().ends_with("Ping"));
    }
}
