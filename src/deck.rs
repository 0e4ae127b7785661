//! The deck controller: single owner of all hardware state.
//!
//! [`DeckController`] ties the components together: it owns the GPIO bank,
//! the delay source, the [`MotorBank`], and the optional [`Actuator`], and
//! is the only thing that writes pins or mutates stored state. Command
//! handling is parse → execute → render:
//!
//! 1. [`parse_line`] produces a fully-validated [`Command`] or a classified
//!    error, with no hardware effect,
//! 2. [`execute`](DeckController::execute) applies it to the motor bank /
//!    actuator and updates stored state,
//! 3. the resulting [`Reply`] (or error) renders as a protocol line.
//!
//! The controller itself is not thread-safe; exactly one command may execute
//! at a time. For the network front end, wrap it in
//! [`SharedDeck`](crate::services::SharedDeck), which serializes access with
//! a mutex (requires the `web` feature).
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::config::DeckConfig;
//! use pumpdeck::deck::DeckController;
//! use pumpdeck::hal::{MockDelay, MockGpio};
//!
//! let config = DeckConfig::default();
//! let mut deck = DeckController::new(MockGpio::new(), MockDelay::new(), &config).unwrap();
//!
//! let reply = deck.handle_line("V1 SET FL=40").unwrap();
//! assert_eq!(reply.render(), "OK V1");
//!
//! let reply = deck.handle_line("V1 GET").unwrap();
//! assert!(reply.render().starts_with("OK V1 FL=40"));
//! ```

use tracing::{debug, info};

use crate::actuator::{Actuator, ActuatorSnapshot};
use crate::command::{parse_line, Command};
use crate::config::DeckConfig;
use crate::error::DeckError;
use crate::motors::{Channel, MotorBank};
use crate::protocol::Reply;
use crate::traits::{Delay, GpioBank};

/// Full deck state snapshot for response formatting.
///
/// Pump percentages appear in fixed [`Channel::ALL`] order. `actuator` is
/// `None` for decks configured without one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckState {
    /// Last commanded percentage per pump channel, in report order.
    pub pumps: [(Channel, i8); Channel::COUNT],
    /// Actuator state, when the deck has an actuator.
    pub actuator: Option<ActuatorSnapshot>,
}

/// Single owner of the pump bank, the actuator, and their pins.
///
/// # Type Parameters
///
/// - `G`: the GPIO backend ([`GpioBank`])
/// - `D`: the delay source for blocking actuator moves ([`Delay`])
pub struct DeckController<G: GpioBank, D: Delay> {
    gpio: G,
    delay: D,
    motors: MotorBank,
    actuator: Option<Actuator>,
}

impl<G: GpioBank, D: Delay> DeckController<G, D> {
    /// Claim all configured pins and drive everything to the stopped state.
    ///
    /// Mirrors the service startup sequence: no output is left floating in
    /// whatever state the bootloader had it.
    pub fn new(gpio: G, delay: D, config: &DeckConfig) -> Result<Self, DeckError> {
        let mut deck = Self {
            gpio,
            delay,
            motors: MotorBank::new(config.pwm_hz, config.motors),
            actuator: config.actuator.map(Actuator::new),
        };

        deck.motors
            .claim_pins(&mut deck.gpio)
            .map_err(DeckError::internal)?;
        if let Some(act) = &deck.actuator {
            act.claim_pins(&mut deck.gpio).map_err(DeckError::internal)?;
        }
        deck.all_stop();

        info!(
            actuator = deck.actuator.is_some(),
            "deck pins claimed, outputs stopped"
        );
        Ok(deck)
    }

    /// Parse and execute one protocol line.
    pub fn handle_line(&mut self, line: &str) -> Result<Reply, DeckError> {
        let cmd = parse_line(line)?;
        self.execute(&cmd)
    }

    /// Execute a validated command.
    ///
    /// Hardware failures surface as [`DeckError::Internal`]; the controller
    /// stays usable for the next command.
    pub fn execute(&mut self, cmd: &Command) -> Result<Reply, DeckError> {
        debug!(verb = cmd.verb(), "executing command");
        match cmd {
            Command::Stop => {
                self.all_stop();
                Ok(Reply::Done)
            }

            Command::Get => Ok(Reply::Status(self.state())),

            Command::Set(updates) => {
                for (channel, pct) in updates {
                    self.motors.set_percent(&mut self.gpio, *channel, *pct)?;
                }
                Ok(Reply::Done)
            }

            Command::ActHome => {
                let act = self.actuator.as_mut().ok_or_else(no_actuator)?;
                act.home(&mut self.gpio, &mut self.delay)?;
                Ok(Reply::Done)
            }

            Command::ActStop => {
                let act = self.actuator.as_mut().ok_or_else(no_actuator)?;
                act.halt(&mut self.gpio);
                Ok(Reply::Done)
            }

            Command::ActGoto(target) => {
                let act = self.actuator.as_mut().ok_or_else(no_actuator)?;
                act.goto(&mut self.gpio, &mut self.delay, *target)?;
                Ok(Reply::Done)
            }
        }
    }

    /// Snapshot the full deck state. Read-only; never fails.
    pub fn state(&self) -> DeckState {
        DeckState {
            pumps: self.motors.percents(),
            actuator: self.actuator.as_ref().map(Actuator::snapshot),
        }
    }

    /// Stop every pump and clear actuator motion state. Never fails; pin
    /// errors are logged and stored state is zeroed regardless.
    pub fn all_stop(&mut self) {
        self.motors.stop_all(&mut self.gpio);
        if let Some(act) = &mut self.actuator {
            act.halt(&mut self.gpio);
        }
    }

    /// Drive everything to a de-energized state and release the pins.
    ///
    /// Called once at process shutdown, after any in-flight command has
    /// completed (the caller holds exclusive access).
    pub fn shutdown(&mut self) {
        self.all_stop();
        if let Err(e) = self.gpio.release_all() {
            tracing::warn!("pin release failed: {e}");
        }
        info!("deck shut down");
    }

    /// Last commanded percentage for one pump channel.
    pub fn pump_percent(&self, channel: Channel) -> i8 {
        self.motors.percent(channel)
    }

    /// The GPIO backend (for inspection in tests and tooling).
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Mutable access to the GPIO backend.
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// The delay source (for inspection in tests and tooling).
    pub fn delay(&self) -> &D {
        &self.delay
    }
}

fn no_actuator() -> DeckError {
    DeckError::State("no actuator configured".into())
}

// ============================================================================
// Tests
// ============================================================================
