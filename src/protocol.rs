//! Wire replies and the `OK V1` / `ERR V1` line rendering.
//!
//! Rendering is a pure read of a [`DeckState`] snapshot: it has no side
//! effects and cannot fail once given a consistent snapshot. The protocol
//! is asymmetric by design - a rendered GET line is not itself a valid
//! command.
//!
//! Reply lines:
//!
//! ```text
//! OK V1                                        STOP / SET / ACT_* success
//! OK V1 FL=0 FR=0 RL=0 RR=0 ACT_POS=0 ...     GET
//! OK V1 HEALTH                                 health probe
//! ERR V1 <CATEGORY> <detail>                   any classified error
//! ```
//!
//! Channels always render in fixed `FL FR RL RR` order; the actuator fields
//! only appear when the deck has an actuator. `ACT_TARGET` renders `-` when
//! no move is in flight.

use std::fmt::Write as _;

use crate::deck::DeckState;
use crate::error::DeckError;

/// A successful command outcome, ready to render as a protocol line.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// Bare acknowledgement (`OK V1`).
    Done,
    /// Full state report (`OK V1 FL=... ...`).
    Status(DeckState),
    /// Fixed health payload (`OK V1 HEALTH`).
    Health,
}

impl Reply {
    /// Render the reply as a protocol line (no trailing newline).
    pub fn render(&self) -> String {
        match self {
            Reply::Done => "OK V1".to_string(),
            Reply::Health => "OK V1 HEALTH".to_string(),
            Reply::Status(state) => render_state(state),
        }
    }
}

/// Render an error as a protocol line (no trailing newline).
pub fn render_error(err: &DeckError) -> String {
    format!("ERR V1 {err}")
}

fn render_state(state: &DeckState) -> String {
    let mut line = String::from("OK V1");
    for (channel, pct) in &state.pumps {
        let _ = write!(line, " {}={}", channel.as_str(), pct);
    }
    if let Some(act) = &state.actuator {
        let _ = write!(line, " ACT_POS={}", act.position.round() as i64);
        let _ = write!(line, " ACT_HOMED={}", u8::from(act.homed));
        let _ = write!(line, " ACT_MOVING={}", u8::from(act.moving));
        match act.target {
            Some(target) => {
                let _ = write!(line, " ACT_TARGET={}", target.round() as i64);
            }
            None => line.push_str(" ACT_TARGET=-"),
        }
    }
    line
}

// ============================================================================
// Tests
// ============================================================================
