//! Network services for the deck (feature-gated).
//!
//! - [`shared`] - mutex-serialized access to one [`DeckController`]
//! - [`web`] - the axum HTTP front end for the text protocol
//!
//! [`DeckController`]: crate::deck::DeckController

pub mod shared;
pub mod web;

pub use shared::SharedDeck;
pub use web::{build_router, run_server, WebServerConfig};
