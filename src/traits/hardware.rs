//! Hardware abstraction traits for digital output and PWM control.
//!
//! This module defines the capability seam between the deck logic and the
//! underlying GPIO driver. Everything the deck ever asks of the hardware is
//! one of four operations: claim a pin as an output, write a digital level,
//! drive a PWM duty cycle, and release the pins at shutdown.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`GpioBank`] | Claim/write/PWM over logical BCM pin numbers |
//! | [`Delay`] | Blocking time source for timed actuator drives |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For Raspberry Pi hardware, use [`crate::hal::rpi`]
//! (requires the `rpi` feature).
//!
//! # Example Implementation
//!
//! ```rust
//! use pumpdeck::traits::{GpioBank, Level};
//!
//! struct NullGpio;
//!
//! impl GpioBank for NullGpio {
//!     type Error = std::convert::Infallible;
//!
//!     fn claim_output(&mut self, _pin: u8) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!
//!     fn write(&mut self, _pin: u8, _level: Level) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!
//!     fn set_pwm(&mut self, _pin: u8, _freq_hz: u32, _duty: u8) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//! ```

use core::fmt;
use core::time::Duration;

/// Digital output level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Logic low (0).
    #[default]
    Low,
    /// Logic high (1).
    High,
}

impl Level {
    /// Returns `High` for `true`, `Low` for `false`.
    #[inline]
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Returns `true` if the level is `High`.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

/// GPIO bank trait - claim pins as outputs, write levels, drive PWM.
///
/// Pin numbers are logical BCM numbers; mapping them to physical pads is the
/// backend's job. Duty cycles are expressed on the deck's duty range
/// ([`crate::motors::DUTY_RANGE`], 0–100); a backend whose hardware wants a
/// different range (e.g. 0–255) rescales inside its implementation.
///
/// # Implementation Notes
///
/// - `claim_output` is called once per pin at startup, before any write.
/// - Writing to an unclaimed pin is a backend error, not undefined behavior.
/// - `release_all` is best-effort; it is called during shutdown after all
///   outputs have been driven low.
pub trait GpioBank {
    /// Error type for pin operations.
    type Error: fmt::Display;

    /// Claim a pin as a digital output.
    fn claim_output(&mut self, pin: u8) -> Result<(), Self::Error>;

    /// Write a digital level to a claimed output pin.
    fn write(&mut self, pin: u8, level: Level) -> Result<(), Self::Error>;

    /// Drive PWM on a claimed pin at `freq_hz` with the given duty
    /// (0..=[`DUTY_RANGE`](crate::motors::DUTY_RANGE)). Duty 0 stops the
    /// PWM output.
    fn set_pwm(&mut self, pin: u8, freq_hz: u32, duty: u8) -> Result<(), Self::Error>;

    /// Release all claimed pins. Called once at shutdown.
    fn release_all(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Blocking delay trait for timed actuator drives.
///
/// Actuator HOME and GOTO are long synchronous operations: energize, wait a
/// computed duration, de-energize. Abstracting the wait lets tests record
/// the requested durations instead of sleeping for real.
pub trait Delay {
    /// Block the calling thread for the given duration.
    fn sleep(&mut self, duration: Duration);
}

/// [`Delay`] backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
