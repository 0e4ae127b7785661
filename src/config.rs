//! Configuration for the pump deck: pin maps, PWM rate, actuator
//! calibration, and the web front end.
//!
//! All configuration is immutable after startup. Structs provide `Default`
//! impls matching the reference wiring and chained `with_*` builders for
//! customization.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::config::{ActuatorConfig, DeckConfig, WebConfig};
//!
//! // Use defaults
//! let config = DeckConfig::default();
//!
//! // Or customize
//! let config = DeckConfig::default()
//!     .with_pwm_hz(1000)
//!     .with_actuator(ActuatorConfig::default().with_stroke_ms(9_500))
//!     .with_web(WebConfig::default().with_port(3000));
//! ```

use crate::motors::Channel;

/// Default PWM carrier frequency for the pump outputs, in hertz.
pub const DEFAULT_PWM_HZ: u32 = 2000;

// ============================================================================
// Motor Pins
// ============================================================================

/// Pin assignment for one pump channel.
///
/// Each pump is driven through an H-bridge with two direction inputs and one
/// PWM input. The `invert` flag reverses the logical sign of direction
/// without changing the command's percentage semantics (for pumps plumbed
/// backwards).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorPins {
    /// Direction input A (BCM pin number).
    pub dir_a: u8,
    /// Direction input B (BCM pin number).
    pub dir_b: u8,
    /// PWM input (BCM pin number).
    pub pwm: u8,
    /// Reverse the logical direction of this channel.
    pub invert: bool,
}

impl MotorPins {
    /// Create a pin assignment with `invert` off.
    pub const fn new(dir_a: u8, dir_b: u8, pwm: u8) -> Self {
        Self {
            dir_a,
            dir_b,
            pwm,
            invert: false,
        }
    }

    /// Set the invert flag.
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

// ============================================================================
// Actuator Config
// ============================================================================

/// Pin assignment and calibration for the linear actuator.
///
/// The actuator has no position sensor; position is estimated from elapsed
/// drive time against `stroke_ms`, the calibrated full-stroke duration.
/// Homing drives retract for `stroke_ms + homing_margin_ms`, guaranteeing
/// travel past the retract-limit switch from any starting position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuatorConfig {
    /// Direction input A (BCM pin number).
    pub dir_a: u8,
    /// Direction input B (BCM pin number).
    pub dir_b: u8,
    /// Enable line (BCM pin number). No PWM; the actuator runs full speed.
    pub enable: u8,
    /// Reverse the extend/retract pin mapping.
    pub invert: bool,
    /// Calibrated full-stroke travel time in milliseconds.
    pub stroke_ms: u64,
    /// Extra homing drive time beyond a full stroke, in milliseconds.
    pub homing_margin_ms: u64,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            dir_a: 17,
            dir_b: 27,
            enable: 22,
            invert: false,
            stroke_ms: 12_000,
            homing_margin_ms: 1_500,
        }
    }
}

impl ActuatorConfig {
    /// Set the direction and enable pins.
    pub const fn with_pins(mut self, dir_a: u8, dir_b: u8, enable: u8) -> Self {
        self.dir_a = dir_a;
        self.dir_b = dir_b;
        self.enable = enable;
        self
    }

    /// Set the invert flag.
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the calibrated full-stroke duration.
    pub const fn with_stroke_ms(mut self, ms: u64) -> Self {
        self.stroke_ms = ms;
        self
    }

    /// Set the homing margin.
    pub const fn with_homing_margin_ms(mut self, ms: u64) -> Self {
        self.homing_margin_ms = ms;
        self
    }

    /// Total homing drive duration: full stroke plus margin.
    pub const fn homing_ms(&self) -> u64 {
        self.stroke_ms + self.homing_margin_ms
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS for all origins.
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the port.
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode.
    pub const fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

// ============================================================================
// Deck Config
// ============================================================================

/// Complete deck configuration.
///
/// The default motor pin map matches the reference wiring:
///
/// | Channel | dir A | dir B | PWM |
/// |---------|-------|-------|-----|
/// | FL      | 5     | 6     | 12  |
/// | FR      | 13    | 19    | 18  |
/// | RL      | 16    | 20    | 21  |
/// | RR      | 23    | 24    | 25  |
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckConfig {
    /// PWM carrier frequency for the pump outputs.
    pub pwm_hz: u32,
    /// Per-channel pin assignments, indexed by [`Channel`] order.
    pub motors: [MotorPins; Channel::COUNT],
    /// Linear actuator, if this deck has one.
    pub actuator: Option<ActuatorConfig>,
    /// Web server settings.
    pub web: WebConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            pwm_hz: DEFAULT_PWM_HZ,
            motors: [
                MotorPins::new(5, 6, 12),   // FL
                MotorPins::new(13, 19, 18), // FR
                MotorPins::new(16, 20, 21), // RL
                MotorPins::new(23, 24, 25), // RR
            ],
            actuator: Some(ActuatorConfig::default()),
            web: WebConfig::default(),
        }
    }
}

impl DeckConfig {
    /// Set the PWM carrier frequency.
    pub fn with_pwm_hz(mut self, hz: u32) -> Self {
        self.pwm_hz = hz;
        self
    }

    /// Set the pin assignment for one channel.
    pub fn with_motor(mut self, channel: Channel, pins: MotorPins) -> Self {
        self.motors[channel.index()] = pins;
        self
    }

    /// Set the actuator configuration.
    pub fn with_actuator(mut self, actuator: ActuatorConfig) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Configure a deck with no actuator (pumps only).
    pub fn without_actuator(mut self) -> Self {
        self.actuator = None;
        self
    }

    /// Set the web server configuration.
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Pin assignment for one channel.
    pub fn motor(&self, channel: Channel) -> &MotorPins {
        &self.motors[channel.index()]
    }
}

// ============================================================================
// Tests
// ============================================================================
