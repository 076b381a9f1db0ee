//! Error types for the dispatcher and the application binary.

/// Errors raised by dispatch units and the dispatch registry.
///
/// Delivery faults (a subscriber returning an error or panicking) are never
/// reported through this type; they are logged and counted in the
/// [`FireReport`](crate::dispatch::FireReport) instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("Invalid dispatch unit configuration: {msg}")]
    Configuration { msg: String },

    #[error("Cant register {actual} as dispatch unit manages {expected}")]
    InvalidSubscriber { expected: String, actual: String },

    #[error("Cant fire {actual} as dispatch unit manages {expected}")]
    WrongEventKind { expected: String, actual: String },

    #[error("No dispatch unit handles event {event}")]
    UnhandledEvent { event: String },

    #[error("Listener {listener} does not satisfy any dispatch unit")]
    NoMatchingUnit { listener: String },
}

/// Errors raised while configuring or starting the application.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration error: {msg}")]
    ConfigurationError { msg: String },

    #[error("Missing config with key \"{key}\"")]
    MissingConfig { key: String },
}
