//! Linear actuator controller with open-loop, time-based positioning.
//!
//! The actuator is driven through two direction pins and one enable line
//! (no PWM) and has no position sensor. Position is an estimate on a 0–100
//! scale, derived purely from elapsed drive time against the calibrated
//! full-stroke duration. Three logical states:
//!
//! - **Unhomed**: position is untrusted; GOTO is refused.
//! - **Homed-Idle**: position is authoritative (last commanded estimate).
//! - **Moving**: a blocking HOME or GOTO drive is in progress.
//!
//! HOME retracts for the full stroke plus a margin, guaranteeing travel past
//! the physical retract-limit switch from any starting position, then
//! declares position 0. GOTO computes a drive duration proportional to the
//! position delta and afterwards trusts the estimate to equal the target
//! exactly - there is no slippage tracking by design.
//!
//! Both HOME and GOTO block the calling command context for their full
//! duration; they are long synchronous operations, not fire-and-forget.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::actuator::Actuator;
//! use pumpdeck::config::ActuatorConfig;
//! use pumpdeck::hal::{MockDelay, MockGpio};
//!
//! let mut gpio = MockGpio::new();
//! let mut delay = MockDelay::new();
//! let mut act = Actuator::new(ActuatorConfig::default());
//! act.claim_pins(&mut gpio).unwrap();
//!
//! assert!(!act.homed());
//! act.home(&mut gpio, &mut delay).unwrap();
//! assert!(act.homed());
//! assert_eq!(act.position(), 0.0);
//!
//! act.goto(&mut gpio, &mut delay, 50.0).unwrap();
//! assert_eq!(act.position(), 50.0);
//! ```

use core::time::Duration;

use tracing::warn;

use crate::config::ActuatorConfig;
use crate::error::DeckError;
use crate::traits::{Delay, GpioBank, Level};

/// GOTO targets closer than this to the current estimate are treated as
/// already arrived; no physical drive happens.
pub const GOTO_DEADZONE: f64 = 0.5;

/// Drive direction along the stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Travel {
    /// Toward full extension (position 100).
    Extend,
    /// Toward the retract limit (position 0).
    Retract,
}

/// Read-only actuator state snapshot.
///
/// Invariant: `target.is_some()` exactly when `moving` is true. `position`
/// is only meaningful when `homed` is true.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuatorSnapshot {
    /// Estimated position, 0.0 (retracted) to 100.0 (extended).
    pub position: f64,
    /// Whether the estimate is anchored by a completed HOME.
    pub homed: bool,
    /// Whether a blocking move is in progress.
    pub moving: bool,
    /// Target of the in-progress move, if any.
    pub target: Option<f64>,
}

/// The linear actuator state machine.
///
/// Owns the estimated position, the homed flag, and the drive sequencing.
/// Pin access goes through the [`GpioBank`] passed to each operation; the
/// actuator itself holds only configuration and estimated state.
#[derive(Debug)]
pub struct Actuator {
    cfg: ActuatorConfig,
    position: f64,
    homed: bool,
    moving: bool,
    target: Option<f64>,
}

impl Actuator {
    /// Create an unhomed actuator. The position estimate starts at 0.0 but
    /// is untrusted until the first successful [`home`](Actuator::home).
    pub fn new(cfg: ActuatorConfig) -> Self {
        Self {
            cfg,
            position: 0.0,
            homed: false,
            moving: false,
            target: None,
        }
    }

    /// Claim the direction and enable pins as outputs.
    pub fn claim_pins<G: GpioBank>(&self, gpio: &mut G) -> Result<(), G::Error> {
        gpio.claim_output(self.cfg.dir_a)?;
        gpio.claim_output(self.cfg.dir_b)?;
        gpio.claim_output(self.cfg.enable)
    }

    /// Home the actuator: drive retract for the full stroke plus margin,
    /// then declare position 0.
    ///
    /// Valid from any state. Blocks for the full homing duration
    /// ([`ActuatorConfig::homing_ms`]).
    pub fn home<G: GpioBank, D: Delay>(
        &mut self,
        gpio: &mut G,
        delay: &mut D,
    ) -> Result<(), DeckError> {
        let duration = Duration::from_millis(self.cfg.homing_ms());
        self.timed_drive(gpio, delay, Travel::Retract, duration, 0.0)?;
        self.position = 0.0;
        self.homed = true;
        Ok(())
    }

    /// Move to a target position estimate in [0, 100].
    ///
    /// Fails with `State` if the actuator is not homed (the estimate would
    /// be meaningless). Targets within [`GOTO_DEADZONE`] of the current
    /// estimate complete immediately with no drive. Otherwise the drive
    /// duration is `|delta| / 100 × stroke_ms`, and on completion the
    /// estimate is set to the target exactly.
    pub fn goto<G: GpioBank, D: Delay>(
        &mut self,
        gpio: &mut G,
        delay: &mut D,
        target: f64,
    ) -> Result<(), DeckError> {
        if !(0.0..=100.0).contains(&target) {
            return Err(DeckError::Range("GOTO must be between 0 and 100".into()));
        }
        if !self.homed {
            return Err(DeckError::State("actuator not homed".into()));
        }

        let delta = target - self.position;
        if delta.abs() < GOTO_DEADZONE {
            self.position = target;
            return Ok(());
        }

        let travel = if delta > 0.0 {
            Travel::Extend
        } else {
            Travel::Retract
        };
        let drive_ms = (delta.abs() / 100.0 * self.cfg.stroke_ms as f64).round() as u64;

        self.timed_drive(gpio, delay, travel, Duration::from_millis(drive_ms), target)?;
        self.position = target;
        Ok(())
    }

    /// De-energize immediately, from any state.
    ///
    /// Clears `moving` and `target`. The position estimate is left
    /// unchanged: an interrupted move leaves the true position unknown, and
    /// with no sensor the last estimate is retained (known estimation gap)
    /// until the next HOME re-anchors it.
    ///
    /// Best-effort: pin failures are logged, never returned - this is also
    /// the STOP and shutdown path.
    pub fn halt<G: GpioBank>(&mut self, gpio: &mut G) {
        if let Err(e) = self.de_energize(gpio) {
            warn!("actuator de-energize failed: {e}");
        }
        self.moving = false;
        self.target = None;
    }

    /// Current position estimate (meaningful only when [`homed`](Actuator::homed)).
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Whether the estimate is anchored by a completed HOME.
    pub fn homed(&self) -> bool {
        self.homed
    }

    /// Whether a blocking move is in progress.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Target of the in-progress move, if any.
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Snapshot of the full actuator state.
    pub fn snapshot(&self) -> ActuatorSnapshot {
        ActuatorSnapshot {
            position: self.position,
            homed: self.homed,
            moving: self.moving,
            target: self.target,
        }
    }

    /// Energize in the given direction, block for `duration`, de-energize.
    ///
    /// `moving`/`target` bracket the drive so a concurrent state read (in a
    /// design where one is possible) sees a consistent pair; they are
    /// cleared again on every exit path.
    fn timed_drive<G: GpioBank, D: Delay>(
        &mut self,
        gpio: &mut G,
        delay: &mut D,
        travel: Travel,
        duration: Duration,
        target: f64,
    ) -> Result<(), DeckError> {
        self.moving = true;
        self.target = Some(target);

        if let Err(e) = self.drive(gpio, travel) {
            self.moving = false;
            self.target = None;
            return Err(DeckError::internal(e));
        }

        delay.sleep(duration);

        let stopped = self.de_energize(gpio);
        self.moving = false;
        self.target = None;
        stopped.map_err(DeckError::internal)
    }

    /// Energize in the given direction.
    ///
    /// The enable line must be low while the direction pins change; both
    /// H-bridge sides hot during the swap would be a momentary short.
    fn drive<G: GpioBank>(&self, gpio: &mut G, travel: Travel) -> Result<(), G::Error> {
        gpio.write(self.cfg.enable, Level::Low)?;

        let extend = (travel == Travel::Extend) != self.cfg.invert;
        let (a, b) = if extend {
            (Level::High, Level::Low)
        } else {
            (Level::Low, Level::High)
        };
        gpio.write(self.cfg.dir_a, a)?;
        gpio.write(self.cfg.dir_b, b)?;

        gpio.write(self.cfg.enable, Level::High)
    }

    /// Enable off, then both direction pins low.
    fn de_energize<G: GpioBank>(&self, gpio: &mut G) -> Result<(), G::Error> {
        gpio.write(self.cfg.enable, Level::Low)?;
        gpio.write(self.cfg.dir_a, Level::Low)?;
        gpio.write(self.cfg.dir_b, Level::Low)
    }
}

// ============================================================================
// Tests
// ============================================================================
