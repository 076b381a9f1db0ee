//! Built-in connection lifecycle events.
//!
//! Each event kind comes with its own listener trait carrying a single
//! handling method. Implementing the listener trait is enough to be a
//! [`Subscriber`] for that kind.

use std::any::Any;
use std::sync::Arc;

use anyhow::Result;

use crate::dispatch::DispatchRegistry;
use crate::dispatch::DispatchUnit;
use crate::error::DispatchError;
use crate::event::Event;
use crate::subscriber::Capability;
use crate::subscriber::Subscriber;

pub const CONNECT_CAPABILITY: &str = "ConnectListener";
pub const CONNECT_HANDLER: &str = "on_connect";
pub const DISCONNECT_CAPABILITY: &str = "DisconnectListener";
pub const DISCONNECT_HANDLER: &str = "on_disconnect";

/// Event fired when a client connects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectEvent {
    pub client_id: String,
    pub address: String,
}

impl Event for ConnectEvent {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Event fired when a client disconnects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisconnectEvent {
    pub client_id: String,
    pub reason: Option<String>,
}

impl Event for DisconnectEvent {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub trait ConnectListener: Send + Sync + 'static {
    fn on_connect(&self, event: &ConnectEvent) -> Result<()>;
}

pub trait DisconnectListener: Send + Sync + 'static {
    fn on_disconnect(&self, event: &DisconnectEvent) -> Result<()>;
}

impl Capability for dyn ConnectListener {
    type Event = ConnectEvent;
    const NAME: &'static str = CONNECT_CAPABILITY;
    const HANDLER: &'static str = CONNECT_HANDLER;
}

impl Capability for dyn DisconnectListener {
    type Event = DisconnectEvent;
    const NAME: &'static str = DISCONNECT_CAPABILITY;
    const HANDLER: &'static str = DISCONNECT_HANDLER;
}

impl<T: ConnectListener> Subscriber<ConnectEvent> for T {
    fn callback(&self, event: &ConnectEvent) -> Result<()> {
        self.on_connect(event)
    }
}

impl<T: DisconnectListener> Subscriber<DisconnectEvent> for T {
    fn callback(&self, event: &DisconnectEvent) -> Result<()> {
        self.on_disconnect(event)
    }
}

/// Dispatch units for the connection events.
pub struct ConnectionUnits {
    pub connect: Arc<DispatchUnit<ConnectEvent>>,
    pub disconnect: Arc<DispatchUnit<DisconnectEvent>>,
}

/// Declares the connect and disconnect units on `registry`, in that order.
pub fn register_connection_events(
    registry: &DispatchRegistry,
) -> Result<ConnectionUnits, DispatchError> {
    Ok(ConnectionUnits {
        connect: DispatchUnit::new::<dyn ConnectListener>(CONNECT_HANDLER, registry)?,
        disconnect: DispatchUnit::new::<dyn DisconnectListener>(DISCONNECT_HANDLER, registry)?,
    })
}
