//! Trait definitions for the hardware abstraction layer.
//!
//! The deck logic is generic over these traits so the same code runs against
//! mock hardware in tests and real GPIO on the Raspberry Pi:
//!
//! - [`GpioBank`] - claim output pins, write levels, drive PWM
//! - [`Delay`] - blocking waits for timed actuator drives
//!
//! Concrete implementations live in [`crate::hal`].

mod hardware;

pub use hardware::{Delay, GpioBank, Level, ThreadDelay};
