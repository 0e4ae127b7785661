//! # pumpdeck
//!
//! A small text-protocol service that drives four bidirectional PWM pump
//! motors and one linear actuator over Raspberry Pi GPIO.
//!
//! ## Features
//!
//! - **Strict line protocol**: `V1 SET FL=40 RR=-25`, `V1 STOP`, `V1 GET`,
//!   `V1 ACT HOME/STOP/GOTO=<pos>` - every line is fully validated before
//!   any pin changes state
//! - **Deadband stop**: commands below 6% magnitude force a full stop
//!   instead of buzzing the pump at near-zero duty
//! - **Open-loop actuator positioning**: no position sensor; position is
//!   estimated from elapsed drive time against a calibrated full-stroke
//!   duration, anchored by homing against the retract limit
//! - **Serialized hardware access**: one command at a time; requests queue
//!   behind blocking actuator moves instead of interleaving pin writes
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - GPIO and delay abstractions
//! - `command` - the protocol grammar and parser
//! - `motors` / `actuator` - the two hardware-facing components
//! - `deck` - the controller that owns all hardware state
//! - `protocol` - `OK`/`ERR` line rendering
//! - `hal` - concrete backends (mock for testing, rppal for the Pi)
//! - `services` - the axum HTTP front end (feature `web`)
//!
//! ## Example
//!
//! ```rust
//! use pumpdeck::config::DeckConfig;
//! use pumpdeck::deck::DeckController;
//! use pumpdeck::hal::{MockDelay, MockGpio};
//!
//! let config = DeckConfig::default();
//! let mut deck = DeckController::new(MockGpio::new(), MockDelay::new(), &config).unwrap();
//!
//! deck.handle_line("V1 ACT HOME").unwrap();
//! deck.handle_line("V1 SET FL=40 FR=40").unwrap();
//!
//! let report = deck.handle_line("V1 GET").unwrap().render();
//! assert_eq!(
//!     report,
//!     "OK V1 FL=40 FR=40 RL=0 RR=0 ACT_POS=0 ACT_HOMED=1 ACT_MOVING=0 ACT_TARGET=-"
//! );
//! ```

#![warn(missing_docs)]

/// Linear actuator state machine with open-loop positioning.
pub mod actuator;
/// Command types and the protocol line parser.
pub mod command;
/// Pin maps, PWM rate, actuator calibration, web settings.
pub mod config;
/// The deck controller owning all hardware state.
pub mod deck;
/// The six-category error taxonomy.
pub mod error;
/// Concrete hardware backends (mock, Raspberry Pi).
pub mod hal;
/// Pump channels, deadband, and direction/duty mapping.
pub mod motors;
/// Reply types and `OK`/`ERR` line rendering.
pub mod protocol;
/// Hardware abstraction traits.
pub mod traits;

/// HTTP front end (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use actuator::{Actuator, ActuatorSnapshot, GOTO_DEADZONE};
pub use command::{parse_line, Command, VERSION_TAG};
pub use config::{ActuatorConfig, DeckConfig, MotorPins, WebConfig, DEFAULT_PWM_HZ};
pub use deck::{DeckController, DeckState};
pub use error::DeckError;
pub use motors::{Channel, MotorBank, DEADBAND_PCT, DUTY_RANGE, MAX_PCT, MIN_PCT};
pub use protocol::{render_error, Reply};
pub use traits::{Delay, GpioBank, Level, ThreadDelay};

#[cfg(feature = "web")]
pub use services::{build_router, run_server, SharedDeck, WebServerConfig};
