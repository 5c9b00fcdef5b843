//! UNO game engine - rules, piles, turn order and events.
//!
//! This module provides the whole engine:
//! - Validated card values and the standard 108-card deck
//! - Player hands with wildcard-aware lookup
//! - A reversible turn sequencer
//! - A per-session event bus for observers
//! - The game itself and the builder that deals it

// Submodules
pub mod builder;
pub mod constants;
pub mod entities;
pub mod events;
pub mod player;
pub mod state_machine;
pub mod turns;

pub use builder::GameBuilder;
pub use state_machine::{Game, GameError, GameSettings, GameStatus, Result};
