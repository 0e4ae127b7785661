//! Desktop deck server on mock GPIO.
//!
//! Runs the full HTTP protocol against mock hardware, for exercising the
//! API and any client tooling without a Raspberry Pi:
//!
//! ```sh
//! cargo run --bin deck_server
//! curl -d 'V1 SET FL=40 RR=-25' http://localhost:8080/cmd
//! curl http://localhost:8080/state
//! ```
//!
//! The delay source is real (`ThreadDelay`), so `V1 ACT HOME` blocks for
//! the configured homing duration exactly as it would on hardware.

use std::sync::Arc;

use pumpdeck::hal::MockGpio;
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
    // Example of customization:
    // let config = DeckConfig::default()
    //     .with_actuator(pumpdeck::ActuatorConfig::default().with_stroke_ms(9_500))
    //     .with_web(pumpdeck::WebConfig::default().with_port(3000));

    let deck = DeckController::new(MockGpio::new(), ThreadDelay, &config)?;
    let shared = Arc::new(SharedDeck::new(deck));
    let web_config = WebServerConfig::from_config(&config.web);

    println!("pumpdeck desktop server (mock GPIO)");
    println!("  cmd:    POST http://{}/cmd", web_config.addr);
    println!("  state:  GET  http://{}/state", web_config.addr);
    println!("  health: GET  http://{}/health", web_config.addr);
    println!();
    println!("Press Ctrl+C to stop.");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        tokio::select! {
            result = run_server(Arc::clone(&shared), web_config) => result?,
            result = tokio::signal::ctrl_c() => result?,
        }
        Ok::<_, anyhow::Error>(())
    })?;

    // De-energize and release before exit, after any in-flight command.
    shared.shutdown();
    Ok(())
}
