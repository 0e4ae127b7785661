//! Error taxonomy for command parsing and execution.
//!
//! Every failure a client can observe falls into one of six categories,
//! matching the wire protocol's `ERR V1 <CATEGORY> <detail>` line:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | [`Syntax`](DeckError::Syntax) | Malformed command grammar |
//! | [`Name`](DeckError::Name) | Unknown channel identifier |
//! | [`Type`](DeckError::Type) | Value not parseable as the required numeric type |
//! | [`Range`](DeckError::Range) | Value outside allowed numeric bounds |
//! | [`State`](DeckError::State) | Operation invalid in the current actuator state |
//! | [`Internal`](DeckError::Internal) | Unexpected failure in the hardware layer |
//!
//! Parser-detected errors (the first four) are surfaced before any hardware
//! effect. Execution-time hardware failures are converted to `Internal` at
//! the dispatch boundary; the service stays up and accepts the next command.
//!
//! # Example
//!
//! ```rust
//! use pumpdeck::DeckError;
//!
//! let err = DeckError::Range("FL must be between -100 and 100".into());
//! assert_eq!(err.category(), "RANGE");
//! assert_eq!(format!("ERR V1 {err}"), "ERR V1 RANGE FL must be between -100 and 100");
//! ```

use core::fmt;

use thiserror::Error;

/// Classified command error.
///
/// `Display` renders `<CATEGORY> <detail>`, so the full wire line is
/// `format!("ERR V1 {err}")`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Malformed command grammar (bad version tag, verb, or token shape).
    #[error("SYNTAX {0}")]
    Syntax(String),

    /// Unknown pump channel name.
    #[error("NAME {0}")]
    Name(String),

    /// Value failed to parse as the required numeric type.
    #[error("TYPE {0}")]
    Type(String),

    /// Value parsed but lies outside the allowed bounds.
    #[error("RANGE {0}")]
    Range(String),

    /// Operation not valid in the current actuator state
    /// (e.g. GOTO before HOME).
    #[error("STATE {0}")]
    State(String),

    /// Unexpected failure from the hardware abstraction layer.
    #[error("INTERNAL {0}")]
    Internal(String),
}

impl DeckError {
    /// The protocol category token for this error.
    pub fn category(&self) -> &'static str {
        match self {
            DeckError::Syntax(_) => "SYNTAX",
            DeckError::Name(_) => "NAME",
            DeckError::Type(_) => "TYPE",
            DeckError::Range(_) => "RANGE",
            DeckError::State(_) => "STATE",
            DeckError::Internal(_) => "INTERNAL",
        }
    }

    /// Wrap a hardware-layer failure as an `Internal` error.
    pub fn internal(err: impl fmt::Display) -> Self {
        DeckError::Internal(err.to_string())
    }

    /// True for errors caused by the request itself (everything except
    /// `Internal`). Transports map these to a 4xx status.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DeckError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(DeckError::Syntax("x".into()).category(), "SYNTAX");
        assert_eq!(DeckError::Name("x".into()).category(), "NAME");
        assert_eq!(DeckError::Type("x".into()).category(), "TYPE");
        assert_eq!(DeckError::Range("x".into()).category(), "RANGE");
        assert_eq!(DeckError::State("x".into()).category(), "STATE");
        assert_eq!(DeckError::Internal("x".into()).category(), "INTERNAL");
    }

    #[test]
    fn display_includes_category_and_detail() {
        let err = DeckError::Syntax("empty command".into());
        assert_eq!(err.to_string(), "SYNTAX empty command");

        let err = DeckError::Internal("pin claim failed".into());
        assert_eq!(err.to_string(), "INTERNAL pin claim failed");
    }

    #[test]
    fn internal_wraps_any_display() {
        let err = DeckError::internal(std::io::Error::new(
            std::io::ErrorKind::Other,
            "gpio unavailable",
        ));
        assert!(matches!(err, DeckError::Internal(_)));
        assert!(err.to_string().contains("gpio unavailable"));
    }

    #[test]
    fn client_error_classification() {
        assert!(DeckError::Syntax("x".into()).is_client_error());
        assert!(DeckError::Range("x".into()).is_client_error());
        assert!(DeckError::State("x".into()).is_client_error());
        assert!(!DeckError::Internal("x".into()).is_client_error());
    }
}
