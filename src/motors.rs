//! Pump motor bank: channel naming, direction/duty mapping, and the
//! deadband stop.
//!
//! Four named pump channels, each driven through an H-bridge (two direction
//! pins plus one PWM pin). A signed percentage command in [-100, 100] maps
//! to direction-pin levels and a PWM duty cycle:
//!
//! - positive: `dir_a` high, `dir_b` low
//! - negative: `dir_a` low, `dir_b` high
//! - magnitude below the deadband: full stop (both direction pins low,
//!   duty 0), preventing motor buzz/stall at near-zero duty
//!
//! A channel's `invert` flag negates the command before any of the above,
//! so inverted channels keep identical percentage semantics at the protocol
//! level.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::config::DeckConfig;
//! use pumpdeck::hal::MockGpio;
//! use pumpdeck::motors::{Channel, MotorBank};
//!
//! let config = DeckConfig::default();
//! let mut gpio = MockGpio::new();
//! let mut bank = MotorBank::new(config.pwm_hz, config.motors);
//! bank.claim_pins(&mut gpio).unwrap();
//!
//! bank.set_percent(&mut gpio, Channel::FrontLeft, 40).unwrap();
//! assert_eq!(bank.percent(Channel::FrontLeft), 40);
//!
//! bank.stop_all(&mut gpio);
//! assert_eq!(bank.percent(Channel::FrontLeft), 0);
//! ```

use tracing::warn;

use crate::config::MotorPins;
use crate::error::DeckError;
use crate::traits::{GpioBank, Level};

/// Minimum command percentage; lower values are a `Range` error.
pub const MIN_PCT: i8 = -100;

/// Maximum command percentage; higher values are a `Range` error.
pub const MAX_PCT: i8 = 100;

/// Commands with post-invert magnitude below this threshold are treated as
/// a full stop.
pub const DEADBAND_PCT: i8 = 6;

/// Full-scale duty value passed to [`GpioBank::set_pwm`].
///
/// Command percentages map directly onto a 0–100 duty scale (the lgpio
/// convention, where `tx_pwm` takes a percent). Hardware that expects an
/// 8-bit 0–255 duty instead rescales inside its `GpioBank` implementation;
/// the deck logic always works in this range.
pub const DUTY_RANGE: u8 = 100;

// ============================================================================
// Channel
// ============================================================================

/// One of the four fixed pump channel slots.
///
/// Wire names (`FL`, `FR`, `RL`, `RR`) follow the deck corner layout. The
/// declaration order here is the fixed report order used by GET responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Front-left pump (`FL`).
    FrontLeft,
    /// Front-right pump (`FR`).
    FrontRight,
    /// Rear-left pump (`RL`).
    RearLeft,
    /// Rear-right pump (`RR`).
    RearRight,
}

impl Channel {
    /// Number of pump channels.
    pub const COUNT: usize = 4;

    /// All channels in fixed report order.
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::FrontLeft,
        Channel::FrontRight,
        Channel::RearLeft,
        Channel::RearRight,
    ];

    /// The channel's wire name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pumpdeck::motors::Channel;
    ///
    /// assert_eq!(Channel::FrontLeft.as_str(), "FL");
    /// assert_eq!(Channel::RearRight.as_str(), "RR");
    /// ```
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::FrontLeft => "FL",
            Channel::FrontRight => "FR",
            Channel::RearLeft => "RL",
            Channel::RearRight => "RR",
        }
    }

    /// Parse a wire name. Exact match only; the protocol grammar is strict.
    ///
    /// # Examples
    ///
    /// ```
    /// use pumpdeck::motors::Channel;
    ///
    /// assert_eq!(Channel::from_token("FL"), Some(Channel::FrontLeft));
    /// assert_eq!(Channel::from_token("fl"), None);
    /// assert_eq!(Channel::from_token("XX"), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "FL" => Some(Channel::FrontLeft),
            "FR" => Some(Channel::FrontRight),
            "RL" => Some(Channel::RearLeft),
            "RR" => Some(Channel::RearRight),
            _ => None,
        }
    }

    /// Index of this channel in [`Channel::ALL`] order.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::FrontLeft => 0,
            Channel::FrontRight => 1,
            Channel::RearLeft => 2,
            Channel::RearRight => 3,
        }
    }
}

// ============================================================================
// Motor Bank
// ============================================================================

/// The four pump channels and their last-commanded percentages.
///
/// Pin assignments are fixed at construction. Stored state is mutated only
/// by a successful [`set_percent`](MotorBank::set_percent) or by
/// [`stop_all`](MotorBank::stop_all).
#[derive(Debug)]
pub struct MotorBank {
    pwm_hz: u32,
    channels: [MotorPins; Channel::COUNT],
    state: [i8; Channel::COUNT],
}

impl MotorBank {
    /// Create a bank from per-channel pin assignments.
    pub fn new(pwm_hz: u32, channels: [MotorPins; Channel::COUNT]) -> Self {
        Self {
            pwm_hz,
            channels,
            state: [0; Channel::COUNT],
        }
    }

    /// Claim every direction and PWM pin as an output.
    pub fn claim_pins<G: GpioBank>(&self, gpio: &mut G) -> Result<(), G::Error> {
        for pins in &self.channels {
            gpio.claim_output(pins.dir_a)?;
            gpio.claim_output(pins.dir_b)?;
            gpio.claim_output(pins.pwm)?;
        }
        Ok(())
    }

    /// Command one channel to a signed percentage.
    ///
    /// The percentage is re-validated against [-100, 100] even though the
    /// parser already guarantees it. The channel's invert flag is applied
    /// first; if the post-invert magnitude is below [`DEADBAND_PCT`] the
    /// command becomes a full stop and the stored state is 0 regardless of
    /// sign. Otherwise direction pins are set from the sign and the duty is
    /// the magnitude scaled to [`DUTY_RANGE`].
    ///
    /// Stored state is the post-invert signed percentage, not the duty.
    pub fn set_percent<G: GpioBank>(
        &mut self,
        gpio: &mut G,
        channel: Channel,
        pct: i8,
    ) -> Result<(), DeckError> {
        if !(MIN_PCT..=MAX_PCT).contains(&pct) {
            return Err(DeckError::Range(format!(
                "{} must be between -100 and 100",
                channel.as_str()
            )));
        }

        let pins = self.channels[channel.index()];
        let effective = if pins.invert { -pct } else { pct };

        if effective == 0 || effective.abs() < DEADBAND_PCT {
            Self::stop_pins(gpio, &pins, self.pwm_hz).map_err(DeckError::internal)?;
            self.state[channel.index()] = 0;
            return Ok(());
        }

        let (a, b) = if effective > 0 {
            (Level::High, Level::Low)
        } else {
            (Level::Low, Level::High)
        };
        gpio.write(pins.dir_a, a).map_err(DeckError::internal)?;
        gpio.write(pins.dir_b, b).map_err(DeckError::internal)?;

        let duty = scale_duty(effective.unsigned_abs());
        gpio.set_pwm(pins.pwm, self.pwm_hz, duty)
            .map_err(DeckError::internal)?;

        self.state[channel.index()] = effective;
        Ok(())
    }

    /// Stop every channel and zero all stored state.
    ///
    /// Best-effort: this is the safety path (STOP command and shutdown), so
    /// pin failures are logged and the stored state is zeroed regardless.
    pub fn stop_all<G: GpioBank>(&mut self, gpio: &mut G) {
        for (i, pins) in self.channels.iter().enumerate() {
            if let Err(e) = Self::stop_pins(gpio, pins, self.pwm_hz) {
                warn!(channel = Channel::ALL[i].as_str(), "pump stop failed: {e}");
            }
            self.state[i] = 0;
        }
    }

    /// Last commanded percentage for one channel.
    pub fn percent(&self, channel: Channel) -> i8 {
        self.state[channel.index()]
    }

    /// All channel percentages in fixed report order.
    pub fn percents(&self) -> [(Channel, i8); Channel::COUNT] {
        let mut out = [(Channel::FrontLeft, 0); Channel::COUNT];
        for (i, ch) in Channel::ALL.iter().enumerate() {
            out[i] = (*ch, self.state[i]);
        }
        out
    }

    fn stop_pins<G: GpioBank>(gpio: &mut G, pins: &MotorPins, pwm_hz: u32) -> Result<(), G::Error> {
        gpio.write(pins.dir_a, Level::Low)?;
        gpio.write(pins.dir_b, Level::Low)?;
        gpio.set_pwm(pins.pwm, pwm_hz, 0)
    }
}

/// Scale a command magnitude (0..=100) onto the duty range.
#[inline]
fn scale_duty(magnitude: u8) -> u8 {
    (u16::from(magnitude) * u16::from(DUTY_RANGE) / 100) as u8
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeckConfig;
    use crate::hal::MockGpio;

    fn bank() -> (MotorBank, MockGpio) {
        let config = DeckConfig::default();
        let mut gpio = MockGpio::new();
        let bank = MotorBank::new(config.pwm_hz, config.motors);
        bank.claim_pins(&mut gpio).unwrap();
        (bank, gpio)
    }

    // =========================================================================
    // Channel Tests
    // =========================================================================

    #[test]
    fn channel_wire_names() {
        assert_eq!(Channel::FrontLeft.as_str(), "FL");
        assert_eq!(Channel::FrontRight.as_str(), "FR");
        assert_eq!(Channel::RearLeft.as_str(), "RL");
        assert_eq!(Channel::RearRight.as_str(), "RR");
    }

    #[test]
    fn channel_from_token_round_trip() {
        for ch in Channel::ALL {
            assert_eq!(Channel::from_token(ch.as_str()), Some(ch));
        }
    }

    #[test]
    fn channel_from_token_strict() {
        assert_eq!(Channel::from_token("fl"), None);
        assert_eq!(Channel::from_token(" FL"), None);
        assert_eq!(Channel::from_token(""), None);
        assert_eq!(Channel::from_token("FLX"), None);
    }

    #[test]
    fn channel_indexes_match_all_order() {
        for (i, ch) in Channel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
        }
    }

    // =========================================================================
    // set_percent Tests
    // =========================================================================

    #[test]
    fn forward_command_sets_direction_and_duty() {
        let (mut bank, mut gpio) = bank();
        bank.set_percent(&mut gpio, Channel::FrontLeft, 40).unwrap();

        // FL pins: dir_a=5, dir_b=6, pwm=12
        assert_eq!(gpio.level(5), Level::High);
        assert_eq!(gpio.level(6), Level::Low);
        assert_eq!(gpio.duty(12), 40);
        assert_eq!(bank.percent(Channel::FrontLeft), 40);
    }

    #[test]
    fn reverse_command_swaps_direction_pins() {
        let (mut bank, mut gpio) = bank();
        bank.set_percent(&mut gpio, Channel::FrontLeft, -40)
            .unwrap();

        assert_eq!(gpio.level(5), Level::Low);
        assert_eq!(gpio.level(6), Level::High);
        assert_eq!(gpio.duty(12), 40);
        assert_eq!(bank.percent(Channel::FrontLeft), -40);
    }

    #[test]
    fn full_scale_both_directions() {
        let (mut bank, mut gpio) = bank();

        bank.set_percent(&mut gpio, Channel::RearRight, 100)
            .unwrap();
        assert_eq!(gpio.duty(25), 100);
        assert_eq!(bank.percent(Channel::RearRight), 100);

        bank.set_percent(&mut gpio, Channel::RearRight, -100)
            .unwrap();
        assert_eq!(gpio.duty(25), 100);
        assert_eq!(bank.percent(Channel::RearRight), -100);
    }

    #[test]
    fn deadband_commands_stop_the_channel() {
        let (mut bank, mut gpio) = bank();

        for pct in [-5, -1, 0, 1, 5] {
            bank.set_percent(&mut gpio, Channel::FrontRight, 50).unwrap();
            bank.set_percent(&mut gpio, Channel::FrontRight, pct).unwrap();

            assert_eq!(gpio.level(13), Level::Low, "pct={pct}");
            assert_eq!(gpio.level(19), Level::Low, "pct={pct}");
            assert_eq!(gpio.duty(18), 0, "pct={pct}");
            assert_eq!(bank.percent(Channel::FrontRight), 0, "pct={pct}");
        }
    }

    #[test]
    fn deadband_threshold_itself_runs() {
        let (mut bank, mut gpio) = bank();

        bank.set_percent(&mut gpio, Channel::FrontLeft, DEADBAND_PCT)
            .unwrap();
        assert_eq!(bank.percent(Channel::FrontLeft), DEADBAND_PCT);
        assert_eq!(gpio.duty(12), DEADBAND_PCT as u8);

        bank.set_percent(&mut gpio, Channel::FrontLeft, -DEADBAND_PCT)
            .unwrap();
        assert_eq!(bank.percent(Channel::FrontLeft), -DEADBAND_PCT);
    }

    #[test]
    fn out_of_range_rejected_without_side_effect() {
        let (mut bank, mut gpio) = bank();
        bank.set_percent(&mut gpio, Channel::FrontLeft, 30).unwrap();
        let ops_before = gpio.ops.len();

        let err = bank
            .set_percent(&mut gpio, Channel::FrontLeft, 101)
            .unwrap_err();
        assert!(matches!(err, DeckError::Range(_)));
        assert_eq!(gpio.ops.len(), ops_before);
        assert_eq!(bank.percent(Channel::FrontLeft), 30);

        let err = bank
            .set_percent(&mut gpio, Channel::FrontLeft, -101)
            .unwrap_err();
        assert!(matches!(err, DeckError::Range(_)));
    }

    #[test]
    fn invert_flag_negates_command() {
        let config =
            DeckConfig::default().with_motor(Channel::RearLeft, MotorPins::new(16, 20, 21).with_invert(true));
        let mut gpio = MockGpio::new();
        let mut bank = MotorBank::new(config.pwm_hz, config.motors);
        bank.claim_pins(&mut gpio).unwrap();

        bank.set_percent(&mut gpio, Channel::RearLeft, 30).unwrap();

        // Inverted: +30 drives the reverse pin pattern and stores -30.
        assert_eq!(gpio.level(16), Level::Low);
        assert_eq!(gpio.level(20), Level::High);
        assert_eq!(bank.percent(Channel::RearLeft), -30);
    }

    #[test]
    fn invert_flag_respects_deadband() {
        let config =
            DeckConfig::default().with_motor(Channel::RearLeft, MotorPins::new(16, 20, 21).with_invert(true));
        let mut gpio = MockGpio::new();
        let mut bank = MotorBank::new(config.pwm_hz, config.motors);
        bank.claim_pins(&mut gpio).unwrap();

        bank.set_percent(&mut gpio, Channel::RearLeft, 3).unwrap();
        assert_eq!(bank.percent(Channel::RearLeft), 0);
        assert_eq!(gpio.duty(21), 0);
    }

    #[test]
    fn stored_state_round_trip() {
        let (mut bank, mut gpio) = bank();
        for pct in [-100i8, -50, -6, 6, 50, 100] {
            bank.set_percent(&mut gpio, Channel::RearLeft, pct).unwrap();
            assert_eq!(bank.percent(Channel::RearLeft), pct);
        }
    }

    // =========================================================================
    // stop_all Tests
    // =========================================================================

    #[test]
    fn stop_all_zeroes_every_channel() {
        let (mut bank, mut gpio) = bank();
        for ch in Channel::ALL {
            bank.set_percent(&mut gpio, ch, 75).unwrap();
        }

        bank.stop_all(&mut gpio);

        for ch in Channel::ALL {
            assert_eq!(bank.percent(ch), 0);
        }
        // All direction pins low, all duties zero.
        for pins in [
            MotorPins::new(5, 6, 12),
            MotorPins::new(13, 19, 18),
            MotorPins::new(16, 20, 21),
            MotorPins::new(23, 24, 25),
        ] {
            assert_eq!(gpio.level(pins.dir_a), Level::Low);
            assert_eq!(gpio.level(pins.dir_b), Level::Low);
            assert_eq!(gpio.duty(pins.pwm), 0);
        }
    }

    #[test]
    fn stop_all_never_fails_on_pin_errors() {
        let (mut bank, mut gpio) = bank();
        bank.set_percent(&mut gpio, Channel::FrontLeft, 60).unwrap();

        gpio.fail_writes = true;
        bank.stop_all(&mut gpio);

        // State is zeroed even though the hardware writes failed.
        for ch in Channel::ALL {
            assert_eq!(bank.percent(ch), 0);
        }
    }

    #[test]
    fn percents_fixed_order() {
        let (mut bank, mut gpio) = bank();
        bank.set_percent(&mut gpio, Channel::RearRight, 10).unwrap();

        let percents = bank.percents();
        assert_eq!(percents[0].0, Channel::FrontLeft);
        assert_eq!(percents[1].0, Channel::FrontRight);
        assert_eq!(percents[2].0, Channel::RearLeft);
        assert_eq!(percents[3].0, Channel::RearRight);
        assert_eq!(percents[3].1, 10);
    }

    #[test]
    fn duty_scaling_is_direct() {
        assert_eq!(scale_duty(0), 0);
        assert_eq!(scale_duty(6), 6);
        assert_eq!(scale_duty(50), 50);
        assert_eq!(scale_duty(100), DUTY_RANGE);
    }
}
