//! Raspberry Pi entry point.
//!
//! Claims the configured GPIO pins, drives everything to the stopped state,
//! and serves the deck protocol until SIGINT or SIGTERM. Shutdown acquires
//! exclusive deck access (queueing behind any in-flight actuator move),
//! stops all pumps, de-energizes the actuator, and releases the pins before
//! the process exits.
//!
//! ```sh
//! cargo run --bin rpi_main --features web,rpi
//! ```

use std::sync::Arc;

use pumpdeck::hal::RppalGpio;
use pumpdeck::services::{run_server, SharedDeck, WebServerConfig};
use pumpdeck::{DeckConfig, DeckController, ThreadDelay};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = DeckConfig::default();

    let gpio = RppalGpio::new()?;
    let deck = DeckController::new(gpio, ThreadDelay, &config)?;
    let shared = Arc::new(SharedDeck::new(deck));
    let web_config = WebServerConfig::from_config(&config.web);

    println!("pumpdeck server listening on http://{}", web_config.addr);
    println!("POST /cmd with 'V1 SET FL=.. FR=.. RL=.. RR=..' (partial ok), 'V1 STOP', 'V1 GET', 'V1 ACT ...'");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        tokio::select! {
            result = run_server(Arc::clone(&shared), web_config) => result?,
            result = shutdown_signal() => result?,
        }
        Ok::<_, anyhow::Error>(())
    })?;

    shared.shutdown();
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = term.recv() => {}
    }
    Ok(())
}
