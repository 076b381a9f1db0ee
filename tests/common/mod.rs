//! Common test utilities and recording listeners.

use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use anyhow::bail;
use pwr_dispatch::event::connection::ConnectEvent;
use pwr_dispatch::event::connection::ConnectListener;
use pwr_dispatch::event::connection::DisconnectEvent;
use pwr_dispatch::event::connection::DisconnectListener;

/// Shared log of `(listener tag, handler name, client id)` calls.
pub type Journal = Arc<Mutex<Vec<(String, &'static str, String)>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<(String, &'static str, String)> {
    journal.lock().unwrap().clone()
}

pub fn connect(client_id: &str) -> ConnectEvent {
    ConnectEvent {
        client_id: client_id.to_string(),
        address: "10.0.0.1:25565".to_string(),
    }
}

#[allow(dead_code)]
pub fn disconnect(client_id: &str) -> DisconnectEvent {
    DisconnectEvent {
        client_id: client_id.to_string(),
        reason: None,
    }
}

/// Listener implementing both connection capabilities.
#[allow(dead_code)]
pub struct SessionListener {
    pub tag: String,
    pub journal: Journal,
    pub fail: bool,
}

#[allow(dead_code)]
impl SessionListener {
    pub fn new(tag: &str, journal: &Journal) -> Self {
        Self {
            tag: tag.to_string(),
            journal: journal.clone(),
            fail: false,
        }
    }

    pub fn failing(tag: &str, journal: &Journal) -> Self {
        Self {
            fail: true,
            ..Self::new(tag, journal)
        }
    }

    fn record(&self, handler: &'static str, client_id: &str) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push((self.tag.clone(), handler, client_id.to_string()));
        if self.fail {
            bail!("{} rejected {}", self.tag, client_id);
        }
        Ok(())
    }
}

impl ConnectListener for SessionListener {
    fn on_connect(&self, event: &ConnectEvent) -> Result<()> {
        self.record("on_connect", &event.client_id)
    }
}

impl DisconnectListener for SessionListener {
    fn on_disconnect(&self, event: &DisconnectEvent) -> Result<()> {
        self.record("on_disconnect", &event.client_id)
    }
}

pwr_dispatch::listener!(SessionListener: ConnectEvent, DisconnectEvent);

/// Listener implementing only the connect capability.
#[allow(dead_code)]
pub struct ConnectOnlyListener {
    pub tag: String,
    pub journal: Journal,
}

#[allow(dead_code)]
impl ConnectOnlyListener {
    pub fn new(tag: &str, journal: &Journal) -> Self {
        Self {
            tag: tag.to_string(),
            journal: journal.clone(),
        }
    }
}

impl ConnectListener for ConnectOnlyListener {
    fn on_connect(&self, event: &ConnectEvent) -> Result<()> {
        self.journal.lock().unwrap().push((
            self.tag.clone(),
            "on_connect",
            event.client_id.clone(),
        ));
        Ok(())
    }
}

pwr_dispatch::listener!(ConnectOnlyListener: ConnectEvent);
