//! Raspberry Pi GPIO backend built on `rppal`.
//!
//! The only module that names the hardware library. Pins are claimed lazily
//! into owned [`OutputPin`] handles; PWM uses rppal's software PWM, which is
//! fine at the 2 kHz carrier the pump bridges want. Dropping the handles
//! (on [`release_all`](crate::traits::GpioBank::release_all) or process
//! exit) resets the pins to their original mode.

use std::collections::HashMap;

use rppal::gpio::{Error as GpioError, Gpio, OutputPin};

use crate::motors::DUTY_RANGE;
use crate::traits::{GpioBank, Level};

/// [`GpioBank`](crate::traits::GpioBank) implementation for the Raspberry
/// Pi's main GPIO header.
pub struct RppalGpio {
    chip: Gpio,
    pins: HashMap<u8, OutputPin>,
}

impl RppalGpio {
    /// Open the GPIO chip. Fails when not running on a Pi or when the
    /// process lacks access to `/dev/gpiomem`.
    pub fn new() -> Result<Self, GpioError> {
        Ok(Self {
            chip: Gpio::new()?,
            pins: HashMap::new(),
        })
    }

    fn pin_mut(&mut self, pin: u8) -> Result<&mut OutputPin, GpioError> {
        self.pins.get_mut(&pin).ok_or(GpioError::PinNotAvailable(pin))
    }
}

impl GpioBank for RppalGpio {
    type Error = GpioError;

    fn claim_output(&mut self, pin: u8) -> Result<(), GpioError> {
        let handle = self.chip.get(pin)?.into_output_low();
        self.pins.insert(pin, handle);
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), GpioError> {
        let handle = self.pin_mut(pin)?;
        match level {
            Level::High => handle.set_high(),
            Level::Low => handle.set_low(),
        }
        Ok(())
    }

    fn set_pwm(&mut self, pin: u8, freq_hz: u32, duty: u8) -> Result<(), GpioError> {
        let handle = self.pin_mut(pin)?;
        if duty == 0 {
            handle.clear_pwm()?;
            handle.set_low();
        } else {
            handle.set_pwm_frequency(f64::from(freq_hz), f64::from(duty) / f64::from(DUTY_RANGE))?;
        }
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), GpioError> {
        // OutputPin handles reset their pins on drop.
        self.pins.clear();
        Ok(())
    }
}
