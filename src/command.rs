//! Command types and the line parser for the `V1` text protocol.
//!
//! The grammar is strict and whitespace-tokenized:
//!
//! ```text
//! V1 STOP
//! V1 GET
//! V1 SET <CH>=<int> [<CH>=<int> ...]     CH in {FL, FR, RL, RR}, no duplicates
//! V1 ACT HOME
//! V1 ACT STOP
//! V1 ACT GOTO=<number 0..100>
//! ```
//!
//! Parsing is pure: a line either produces a fully-validated [`Command`] or
//! a classified [`DeckError`], and nothing touches hardware until the whole
//! line has been accepted. In particular, a `SET` with one bad assignment
//! rejects the entire command - partial application is impossible by
//! construction.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::command::{parse_line, Command};
//! use pumpdeck::motors::Channel;
//!
//! let cmd = parse_line("V1 SET FL=40 RR=-25").unwrap();
//! assert_eq!(
//!     cmd,
//!     Command::Set(vec![(Channel::FrontLeft, 40), (Channel::RearRight, -25)])
//! );
//!
//! assert!(parse_line("V1 SET FL=999").is_err());
//! ```

use crate::error::DeckError;
use crate::motors::{Channel, MAX_PCT, MIN_PCT};

/// Protocol version tag; every command line starts with it.
pub const VERSION_TAG: &str = "V1";

/// A fully-validated protocol command.
///
/// Produced only by [`parse_line`]; never partially populated. `Set` holds
/// at least one assignment with no duplicate channel, in line order.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `V1 STOP` - stop all pumps and clear actuator motion state.
    Stop,
    /// `V1 GET` - report pump and actuator state.
    Get,
    /// `V1 SET ...` - command one or more pump percentages.
    Set(Vec<(Channel, i8)>),
    /// `V1 ACT HOME` - home the actuator against its retract limit.
    ActHome,
    /// `V1 ACT STOP` - de-energize the actuator immediately.
    ActStop,
    /// `V1 ACT GOTO=<target>` - move the actuator to a position estimate.
    ActGoto(f64),
}

impl Command {
    /// The command's verb, for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Stop => "STOP",
            Command::Get => "GET",
            Command::Set(_) => "SET",
            Command::ActHome => "ACT HOME",
            Command::ActStop => "ACT STOP",
            Command::ActGoto(_) => "ACT GOTO",
        }
    }
}

/// Parse one protocol line into a [`Command`].
///
/// Validation order follows the grammar: version tag, verb, then per-verb
/// argument checks. All errors are classified; see [`DeckError`].
pub fn parse_line(line: &str) -> Result<Command, DeckError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DeckError::Syntax("empty command".into()));
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 || parts[0] != VERSION_TAG {
        return Err(DeckError::Syntax("expected 'V1 <VERB>'".into()));
    }

    match parts[1] {
        "STOP" => {
            if parts.len() != 2 {
                return Err(DeckError::Syntax("STOP takes no args".into()));
            }
            Ok(Command::Stop)
        }

        "GET" => {
            if parts.len() != 2 {
                return Err(DeckError::Syntax("GET takes no args".into()));
            }
            Ok(Command::Get)
        }

        "SET" => parse_set(&parts[2..]),

        "ACT" => parse_act(&parts[2..]),

        verb => Err(DeckError::Syntax(format!("unknown verb {verb}"))),
    }
}

/// Parse the assignment tokens of a SET line.
fn parse_set(tokens: &[&str]) -> Result<Command, DeckError> {
    if tokens.is_empty() {
        return Err(DeckError::Syntax(
            "SET requires at least one assignment".into(),
        ));
    }

    let mut updates: Vec<(Channel, i8)> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some((name, value)) = token.split_once('=') else {
            return Err(DeckError::Syntax(format!(
                "bad assignment '{token}' (expected NAME=VALUE)"
            )));
        };
        if value.contains('=') {
            return Err(DeckError::Syntax(format!(
                "bad assignment '{token}' (expected NAME=VALUE)"
            )));
        }

        let Some(channel) = Channel::from_token(name) else {
            return Err(DeckError::Name(format!("unknown pump {name}")));
        };
        if updates.iter().any(|(c, _)| *c == channel) {
            return Err(DeckError::Syntax(format!("duplicate assignment for {name}")));
        }

        let pct: i32 = value
            .parse()
            .map_err(|_| DeckError::Type(format!("{name} must be an integer")))?;
        if pct < i32::from(MIN_PCT) || pct > i32::from(MAX_PCT) {
            return Err(DeckError::Range(format!(
                "{name} must be between -100 and 100"
            )));
        }

        updates.push((channel, pct as i8));
    }

    Ok(Command::Set(updates))
}

/// Parse the single subcommand token of an ACT line.
fn parse_act(tokens: &[&str]) -> Result<Command, DeckError> {
    let [sub] = tokens else {
        return Err(DeckError::Syntax("ACT takes exactly one subcommand".into()));
    };

    match *sub {
        "HOME" => Ok(Command::ActHome),
        "STOP" => Ok(Command::ActStop),
        _ => {
            if let Some(value) = sub.strip_prefix("GOTO=") {
                let target: f64 = value
                    .parse()
                    .map_err(|_| DeckError::Type("GOTO must be a number".into()))?;
                if !(0.0..=100.0).contains(&target) {
                    return Err(DeckError::Range("GOTO must be between 0 and 100".into()));
                }
                Ok(Command::ActGoto(target))
            } else {
                Err(DeckError::Syntax(format!("unknown ACT subcommand '{sub}'")))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
