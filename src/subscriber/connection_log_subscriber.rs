use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use anyhow::anyhow;
use log::debug;
use log::info;

use crate::event::connection::ConnectEvent;
use crate::event::connection::ConnectListener;
use crate::event::connection::DisconnectEvent;
use crate::event::connection::DisconnectListener;

/// Tracks open client sessions and logs their duration on disconnect.
pub struct ConnectionLogSubscriber {
    sessions: Mutex<HashMap<String, Instant>>,
}

impl ConnectionLogSubscriber {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of clients currently connected.
    pub fn active(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or_default()
    }

    fn close_session(&self, client_id: &str) -> Result<Duration> {
        let joined = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("Session table poisoned"))?
            .remove(client_id)
            .ok_or_else(|| anyhow!("No open session for client {}", client_id))?;
        Ok(joined.elapsed())
    }
}

impl ConnectListener for ConnectionLogSubscriber {
    fn on_connect(&self, event: &ConnectEvent) -> Result<()> {
        debug!("Client {} connected from {}", event.client_id, event.address);
        let previous = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("Session table poisoned"))?
            .insert(event.client_id.clone(), Instant::now());

        if previous.is_some() {
            info!("Client {} reconnected, restarting session", event.client_id);
        }
        Ok(())
    }
}

impl DisconnectListener for ConnectionLogSubscriber {
    fn on_disconnect(&self, event: &DisconnectEvent) -> Result<()> {
        let duration = self.close_session(&event.client_id)?;
        info!(
            "Client {} disconnected after {:.2}s ({})",
            event.client_id,
            duration.as_secs_f64(),
            event.reason.as_deref().unwrap_or("no reason given")
        );
        Ok(())
    }
}

crate::listener!(ConnectionLogSubscriber: ConnectEvent, DisconnectEvent);
