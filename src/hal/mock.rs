//! Mock implementations for testing without hardware.
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockGpio`] | [`GpioBank`] | Records every pin operation for verification |
//! | [`MockDelay`] | [`Delay`] | Records requested sleeps, returns instantly |
//!
//! `MockGpio` keeps both an ordered operation log ([`MockGpio::ops`]) for
//! sequencing assertions (e.g. enable de-asserted before a direction swap)
//! and the resulting pin levels/duties for end-state assertions.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::hal::{MockGpio, PinOp};
//! use pumpdeck::traits::{GpioBank, Level};
//!
//! let mut gpio = MockGpio::new();
//! gpio.claim_output(5).unwrap();
//! gpio.write(5, Level::High).unwrap();
//!
//! assert_eq!(gpio.level(5), Level::High);
//! assert!(matches!(gpio.ops[1], PinOp::Write(5, Level::High)));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::traits::{Delay, GpioBank, Level};

/// One recorded GPIO operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOp {
    /// Pin claimed as an output.
    Claim(u8),
    /// Digital level written.
    Write(u8, Level),
    /// PWM configured.
    Pwm {
        /// Pin the PWM was applied to.
        pin: u8,
        /// Carrier frequency in hertz.
        freq_hz: u32,
        /// Duty on the deck's duty range.
        duty: u8,
    },
    /// All pins released.
    Release,
}

/// Mock GPIO bank for testing.
///
/// Enforces the claim-before-use contract (writing an unclaimed pin is an
/// error) and can simulate hardware failures via
/// [`fail_writes`](MockGpio::fail_writes).
#[derive(Debug, Default)]
pub struct MockGpio {
    /// Ordered log of every operation.
    pub ops: Vec<PinOp>,
    /// Pins currently claimed as outputs.
    pub claimed: BTreeSet<u8>,
    /// Last written level per pin.
    pub levels: BTreeMap<u8, Level>,
    /// Last PWM duty per pin.
    pub duties: BTreeMap<u8, u8>,
    /// When true, every write/PWM operation fails.
    pub fail_writes: bool,
    /// Whether `release_all` has been called.
    pub released: bool,
}

impl MockGpio {
    /// Creates a new mock with no claimed pins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written level for a pin (`Low` if never written).
    pub fn level(&self, pin: u8) -> Level {
        self.levels.get(&pin).copied().unwrap_or(Level::Low)
    }

    /// Last PWM duty for a pin (0 if never configured).
    pub fn duty(&self, pin: u8) -> u8 {
        self.duties.get(&pin).copied().unwrap_or(0)
    }

    /// Whether a pin has been claimed as an output.
    pub fn is_claimed(&self, pin: u8) -> bool {
        self.claimed.contains(&pin)
    }

    /// All levels ever written to one pin, in order.
    pub fn writes(&self, pin: u8) -> Vec<Level> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PinOp::Write(p, level) if *p == pin => Some(*level),
                _ => None,
            })
            .collect()
    }
}

impl GpioBank for MockGpio {
    type Error = String;

    fn claim_output(&mut self, pin: u8) -> Result<(), String> {
        self.claimed.insert(pin);
        self.ops.push(PinOp::Claim(pin));
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), String> {
        if self.fail_writes {
            return Err(format!("simulated write failure on pin {pin}"));
        }
        if !self.claimed.contains(&pin) {
            return Err(format!("pin {pin} not claimed"));
        }
        self.levels.insert(pin, level);
        self.ops.push(PinOp::Write(pin, level));
        Ok(())
    }

    fn set_pwm(&mut self, pin: u8, freq_hz: u32, duty: u8) -> Result<(), String> {
        if self.fail_writes {
            return Err(format!("simulated pwm failure on pin {pin}"));
        }
        if !self.claimed.contains(&pin) {
            return Err(format!("pin {pin} not claimed"));
        }
        self.duties.insert(pin, duty);
        self.ops.push(PinOp::Pwm { pin, freq_hz, duty });
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), String> {
        self.claimed.clear();
        self.released = true;
        self.ops.push(PinOp::Release);
        Ok(())
    }
}

/// Mock delay for testing.
///
/// Records each requested sleep instead of blocking, so the timing of
/// blocking actuator moves can be asserted directly.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use pumpdeck::hal::MockDelay;
/// use pumpdeck::traits::Delay;
///
/// let mut delay = MockDelay::new();
/// delay.sleep(Duration::from_millis(250));
/// assert_eq!(delay.total(), Duration::from_millis(250));
/// ```
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Every requested sleep, in order.
    pub slept: Vec<Duration>,
}

impl MockDelay {
    /// Creates a new mock delay with no recorded sleeps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all requested sleeps.
    pub fn total(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Delay for MockDelay {
    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
    }
}

// ============================================================================
// Tests
// ============================================================================
