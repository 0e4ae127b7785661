//! Shared, serialized access to a single [`DeckController`].
//!
//! `SharedDeck` wraps the controller in a `Mutex` so that exactly one
//! command executes against the hardware at a time. Requests that arrive
//! while a blocking actuator move is in flight queue on the lock in arrival
//! order; pin writes from different requests can never interleave.
//!
//! A consequence worth spelling out: `ACT STOP` cannot interrupt an
//! in-progress HOME or GOTO. It queues behind the move and de-energizes an
//! actuator that has already stopped. That is inherent to the open-loop,
//! blocking-drive design, not a scheduling bug.
//!
//! # Thread Safety
//!
//! - A plain `Mutex` (not `RwLock`): every command except GET writes, and
//!   GET is cheap, so reader/writer separation buys nothing.
//! - Handlers must not hold the lock across await points; all access goes
//!   through the closure-based [`with_deck`](SharedDeck::with_deck).

use std::sync::Mutex;

use crate::deck::{DeckController, DeckState};
use crate::error::DeckError;
use crate::protocol::Reply;
use crate::traits::{Delay, GpioBank};

/// Thread-safe wrapper serializing all access to one [`DeckController`].
pub struct SharedDeck<G: GpioBank, D: Delay> {
    deck: Mutex<DeckController<G, D>>,
}

impl<G: GpioBank, D: Delay> SharedDeck<G, D> {
    /// Wrap a controller for shared use.
    pub fn new(deck: DeckController<G, D>) -> Self {
        Self {
            deck: Mutex::new(deck),
        }
    }

    /// Run a closure with exclusive access to the controller.
    ///
    /// Blocks until any in-flight command (including a multi-second
    /// actuator move) completes. Callers on an async runtime should wrap
    /// this in `spawn_blocking`.
    pub fn with_deck<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut DeckController<G, D>) -> R,
    {
        let mut guard = self.deck.lock().unwrap();
        f(&mut guard)
    }

    /// Parse and execute one protocol line under the lock.
    pub fn handle_line(&self, line: &str) -> Result<Reply, DeckError> {
        self.with_deck(|deck| deck.handle_line(line))
    }

    /// Snapshot the deck state (brief lock).
    pub fn state(&self) -> DeckState {
        self.with_deck(|deck| deck.state())
    }

    /// Stop everything, de-energize, and release pins.
    ///
    /// Queues behind any in-flight command, so shutdown is deterministic
    /// even when a move is in progress.
    pub fn shutdown(&self) {
        self.with_deck(|deck| deck.shutdown());
    }
}

// ============================================================================
// Tests
// ============================================================================
