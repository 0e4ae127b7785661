//! Hardware Abstraction Layer implementations.
//!
//! Concrete implementations of the traits in [`crate::traits`]:
//!
//! - `mock`: test doubles for desktop development and the test suite
//! - `rpi`: Raspberry Pi GPIO via `rppal` (requires the `rpi` feature)

pub mod mock;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use mock::{MockDelay, MockGpio, PinOp};

#[cfg(feature = "rpi")]
pub use rpi::RppalGpio;
