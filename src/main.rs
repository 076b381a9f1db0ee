//! Application entry point for pwr-dispatch.
//!
//! Wires a registry with the built-in connection events and replays a short
//! connection sequence through it.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;
use pwr_dispatch::DispatchRegistry;
use pwr_dispatch::config::Config;
use pwr_dispatch::event::connection::ConnectEvent;
use pwr_dispatch::event::connection::DisconnectEvent;
use pwr_dispatch::event::connection::register_connection_events;
use pwr_dispatch::logging::setup_logging;
use pwr_dispatch::subscriber::connection_log_subscriber::ConnectionLogSubscriber;

fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let registry = setup_registry(&config)?;
    setup_subscribers(&registry)?;

    info!(
        "pwr-dispatch is up in {:.2}s.",
        init_start.elapsed().as_secs_f64()
    );

    run(&registry)
}

fn load_config() -> Result<Config> {
    let mut config = Config::new();
    config.load()?;
    setup_logging(&config)?;
    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

fn setup_registry(config: &Config) -> Result<Arc<DispatchRegistry>> {
    debug!("Setting up dispatch registry...");
    let registry = Arc::new(DispatchRegistry::with_options(config.registry_options()?));
    register_connection_events(&registry)?;
    Ok(registry)
}

fn setup_subscribers(registry: &DispatchRegistry) -> Result<()> {
    debug!("Setting up Subscribers...");
    let joined = registry.register_all(Arc::new(ConnectionLogSubscriber::new()))?;
    debug!("Connection log subscribed to {} event kinds", joined);
    Ok(())
}

fn run(registry: &DispatchRegistry) -> Result<()> {
    let client_id = "demo-client".to_string();

    registry.fire(&ConnectEvent {
        client_id: client_id.clone(),
        address: "127.0.0.1:25565".to_string(),
    })?;
    registry.fire(&DisconnectEvent {
        client_id: client_id.clone(),
        reason: Some("demo finished".to_string()),
    })?;

    // Second disconnect has no open session: logged as a delivery warning.
    let report = registry.fire(&DisconnectEvent {
        client_id,
        reason: None,
    })?;
    if let Some(report) = report {
        info!(
            "Fired {}: {} delivered, {} failed",
            report.event,
            report.delivered(),
            report.failed
        );
    }

    Ok(())
}
