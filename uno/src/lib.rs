//! # UNO
//!
//! A rule-validating UNO engine for one table of 2 to 10 players.
//!
//! A [`Game`] owns the draw pile, the discard pile, every hand and the seating
//! order. Callers drive it through a handful of moves; each move is validated
//! in full before anything changes, then announced on the session's
//! [`EventBus`] so observers can react without the engine knowing about them.
//!
//! ## Rules covered
//!
//! - **Number** cards match by color or value
//! - **Skip** passes over the next player
//! - **Reverse** flips the direction of play
//! - **Draw Two** / **Wild Draw Four** make the next player draw and lose
//!   their turn
//! - **Wild** cards can be played on anything and take the color the player
//!   picks
//!
//! The first player to empty their hand wins and the game stops accepting
//! moves.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, deck, hands, turn order, events and the engine
//!
//! ## Example
//!
//! ```
//! use uno::{Game, GameBuilder};
//!
//! let mut game: Game = GameBuilder::new()
//!     .with_players(["alice", "bob"])
//!     .with_seed(7)
//!     .build()
//!     .unwrap();
//!
//! let alice = game.current_player().id;
//! game.draw_card(alice).unwrap();
//! assert_eq!(game.hand_cards(alice).unwrap().count(), 8);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Game, GameBuilder, GameError, GameSettings, GameStatus, Result,
    constants::{self, DECK_SIZE, DEFAULT_HAND_SIZE, MAX_DEALT_CARDS, MAX_PLAYERS, MIN_PLAYERS},
    entities::{self, Card, CardKind, Color, Deck, ValidationError},
    events::{self, DomainEvent, EventBus, EventLogger, EventRecorder, EventSubscriber, GameEvent},
    player::{PlayerId, PlayerInfo, PlayerView},
    turns::Direction,
};
