//! Integration tests for the deck controller.
//!
//! These drive the controller end-to-end through protocol lines, the way
//! the HTTP front end does, and verify the externally observable contract:
//! stored state, response lines, and recorded pin/delay activity.

use std::time::Duration;

use pumpdeck::hal::{MockDelay, MockGpio};
use pumpdeck::{ActuatorConfig, Channel, DeckConfig, DeckController, DeckError};

fn deck() -> DeckController<MockGpio, MockDelay> {
    DeckController::new(MockGpio::new(), MockDelay::new(), &DeckConfig::default()).unwrap()
}

// ============================================================================
// GET / initial state
// ============================================================================

#[test]
fn get_before_any_command() {
    let mut deck = deck();
    let line = deck.handle_line("V1 GET").unwrap().render();
    assert_eq!(
        line,
        "OK V1 FL=0 FR=0 RL=0 RR=0 ACT_POS=0 ACT_HOMED=0 ACT_MOVING=0 ACT_TARGET=-"
    );
}

#[test]
fn get_is_read_only() {
    let mut deck = deck();
    deck.handle_line("V1 SET FL=40").unwrap();
    let ops_before = deck.gpio().ops.len();

    deck.handle_line("V1 GET").unwrap();
    deck.handle_line("V1 GET").unwrap();

    assert_eq!(deck.gpio().ops.len(), ops_before);
}

#[test]
fn get_ordering_is_stable_across_calls() {
    let mut deck = deck();
    deck.handle_line("V1 SET RR=10 FL=20").unwrap();

    let first = deck.handle_line("V1 GET").unwrap().render();
    let second = deck.handle_line("V1 GET").unwrap().render();
    assert_eq!(first, second);
    assert!(first.starts_with("OK V1 FL=20 FR=0 RL=0 RR=10"));
}

// ============================================================================
// SET semantics
// ============================================================================

#[test]
fn set_round_trips_every_percentage() {
    let mut deck = deck();
    for pct in (-100..=100).filter(|p: &i32| p.unsigned_abs() >= 6) {
        deck.handle_line(&format!("V1 SET FR={pct}")).unwrap();
        assert_eq!(i32::from(deck.pump_percent(Channel::FrontRight)), pct);
    }
}

#[test]
fn set_below_deadband_stores_zero() {
    let mut deck = deck();
    for pct in -5..=5 {
        deck.handle_line("V1 SET FR=50").unwrap();
        deck.handle_line(&format!("V1 SET FR={pct}")).unwrap();
        assert_eq!(deck.pump_percent(Channel::FrontRight), 0, "pct={pct}");
        // Physical stop: duty 0 on FR's PWM pin (18).
        assert_eq!(deck.gpio().duty(18), 0, "pct={pct}");
    }
}

#[test]
fn set_duplicate_channel_is_syntax_and_leaves_state() {
    let mut deck = deck();
    deck.handle_line("V1 SET FL=33").unwrap();

    let err = deck.handle_line("V1 SET FL=10 FL=20").unwrap_err();
    assert!(matches!(err, DeckError::Syntax(_)));
    assert_eq!(deck.pump_percent(Channel::FrontLeft), 33);
}

#[test]
fn set_is_atomic_across_assignments() {
    let mut deck = deck();

    let err = deck.handle_line("V1 SET FL=10 FR=999").unwrap_err();
    assert!(matches!(err, DeckError::Range(_)));

    // FL untouched even though its assignment was valid and listed first.
    assert_eq!(deck.pump_percent(Channel::FrontLeft), 0);
    assert_eq!(deck.gpio().duty(12), 0);
}

// ============================================================================
// Actuator flow
// ============================================================================

#[test]
fn goto_before_home_is_rejected() {
    let mut deck = deck();
    let err = deck.handle_line("V1 ACT GOTO=50").unwrap_err();
    assert!(matches!(err, DeckError::State(_)));

    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.contains("ACT_HOMED=0"));
}

#[test]
fn home_establishes_zero() {
    let mut deck = deck();
    deck.handle_line("V1 ACT HOME").unwrap();

    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.contains("ACT_POS=0 ACT_HOMED=1 ACT_MOVING=0 ACT_TARGET=-"));

    // The drive lasted stroke + margin.
    let expected = ActuatorConfig::default().homing_ms();
    assert_eq!(
        deck.delay().slept,
        vec![Duration::from_millis(expected)]
    );
}

#[test]
fn goto_full_stroke_takes_calibrated_duration() {
    let mut deck = deck();
    deck.handle_line("V1 ACT HOME").unwrap();
    deck.handle_line("V1 ACT GOTO=100").unwrap();

    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.contains("ACT_POS=100 ACT_HOMED=1 ACT_MOVING=0"));

    let stroke = ActuatorConfig::default().stroke_ms;
    assert_eq!(deck.delay().slept[1], Duration::from_millis(stroke));
}

#[test]
fn goto_to_current_position_is_immediate() {
    let mut deck = deck();
    deck.handle_line("V1 ACT HOME").unwrap();
    deck.handle_line("V1 ACT GOTO=50").unwrap();
    let sleeps_before = deck.delay().slept.len();
    let ops_before = deck.gpio().ops.len();

    deck.handle_line("V1 ACT GOTO=50.2").unwrap();

    assert_eq!(deck.delay().slept.len(), sleeps_before);
    assert_eq!(deck.gpio().ops.len(), ops_before);
    // Estimate snaps to the requested target.
    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.contains("ACT_POS=50"));
}

#[test]
fn act_stop_keeps_the_estimate() {
    let mut deck = deck();
    deck.handle_line("V1 ACT HOME").unwrap();
    deck.handle_line("V1 ACT GOTO=70").unwrap();

    deck.handle_line("V1 ACT STOP").unwrap();

    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.contains("ACT_POS=70 ACT_HOMED=1 ACT_MOVING=0 ACT_TARGET=-"));
}

// ============================================================================
// STOP semantics
// ============================================================================

#[test]
fn stop_zeroes_everything_and_never_fails() {
    let mut deck = deck();
    deck.handle_line("V1 SET FL=50 FR=-60 RL=70 RR=-80").unwrap();
    deck.handle_line("V1 ACT HOME").unwrap();

    let reply = deck.handle_line("V1 STOP").unwrap();
    assert_eq!(reply.render(), "OK V1");

    let line = deck.handle_line("V1 GET").unwrap().render();
    assert!(line.starts_with("OK V1 FL=0 FR=0 RL=0 RR=0"));
    assert!(line.contains("ACT_MOVING=0 ACT_TARGET=-"));
}

#[test]
fn stop_works_from_a_fresh_deck() {
    let mut deck = deck();
    // Nothing was ever commanded; STOP must still succeed.
    assert_eq!(deck.handle_line("V1 STOP").unwrap().render(), "OK V1");
}

#[test]
fn stop_succeeds_despite_hardware_failure() {
    let mut deck = deck();
    deck.handle_line("V1 SET FL=90").unwrap();
    deck.gpio_mut().fail_writes = true;

    assert!(deck.handle_line("V1 STOP").is_ok());
    assert_eq!(deck.pump_percent(Channel::FrontLeft), 0);
}

// ============================================================================
// Error dispatch
// ============================================================================

#[test]
fn hardware_failure_reports_internal_and_recovers() {
    let mut deck = deck();
    deck.gpio_mut().fail_writes = true;

    let err = deck.handle_line("V1 SET FL=40").unwrap_err();
    assert!(matches!(err, DeckError::Internal(_)));

    deck.gpio_mut().fail_writes = false;
    assert!(deck.handle_line("V1 SET FL=40").is_ok());
    assert_eq!(deck.pump_percent(Channel::FrontLeft), 40);
}

#[test]
fn error_lines_carry_the_category() {
    let mut deck = deck();
    let err = deck.handle_line("V1 SET XX=10").unwrap_err();
    assert_eq!(
        pumpdeck::render_error(&err),
        "ERR V1 NAME unknown pump XX"
    );
}
