use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::{fmt, rc::Rc};
use thiserror::Error;

use super::{
    builder::GameBuilder,
    constants::{
        DECK_SIZE, DEFAULT_HAND_SIZE, DRAW_TWO_PENALTY, MAX_DEALT_CARDS, MAX_PLAYERS,
        MIN_PLAYERS, WILD_DRAW_FOUR_PENALTY,
    },
    entities::{Card, CardKind, Deck, DiscardPile, ValidationError},
    events::{DomainEvent, EventBus, GameEvent},
    player::{PlayerId, PlayerInfo, PlayerView},
    turns::{Direction, TurnSequencer},
};

/// Errors returned by the engine. Every check runs before any state is
/// touched, so a failed call leaves the game exactly as it was.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("invalid card: {0}")]
    Validation(#[from] ValidationError),
    #[error("player {0} is not in this game")]
    UnknownPlayer(PlayerId),
    #[error("{0} is not in your hand")]
    CardNotInHand(Card),
    #[error("can't play {card} on {top}")]
    IllegalMove { card: Card, top: Card },
    #[error("pick a color for the wild card")]
    MissingWildColor,
    #[error("no cards left to draw")]
    DeckExhausted,
    #[error("game is over")]
    GameOver,
    #[error("not your turn")]
    OutOfTurn(PlayerId),
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("{players} players is more than the table's {max}")]
    TooManyPlayers { players: usize, max: usize },
    #[error("invalid deck: {0}")]
    InvalidDeck(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Game configuration settings
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub hand_size: usize,
    pub min_players: usize,
    pub max_players: usize,
    /// Fixes the shuffle so a session can be replayed.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(DEFAULT_HAND_SIZE, MIN_PLAYERS, MAX_PLAYERS, None)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(
        hand_size: usize,
        min_players: usize,
        max_players: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            hand_size,
            min_players,
            max_players,
            seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.hand_size == 0 {
            return Err(GameError::InvalidSettings(
                "hand_size must be > 0".to_string(),
            ));
        }
        if self.min_players < MIN_PLAYERS {
            return Err(GameError::InvalidSettings(format!(
                "min_players must be >= {MIN_PLAYERS}"
            )));
        }
        if self.max_players < self.min_players {
            return Err(GameError::InvalidSettings(
                "max_players must be >= min_players".to_string(),
            ));
        }
        if self.max_players.saturating_mul(self.hand_size) > MAX_DEALT_CARDS {
            return Err(GameError::InvalidSettings(format!(
                "{} players with {} cards each exceed the {MAX_DEALT_CARDS} cards a {DECK_SIZE}-card deck can deal",
                self.max_players, self.hand_size
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    InProgress,
    Over,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InProgress => "in progress",
            Self::Over => "over",
        };
        write!(f, "{repr}")
    }
}

/// One UNO session.
///
/// A game owns the piles, the seating order and every hand, and is only
/// mutated through [`Game::play_card`], [`Game::draw_card`] and
/// [`Game::pass_turn`]. Each successful move is announced on the session's
/// [`EventBus`] before the call returns.
///
/// Build one with [`GameBuilder`].
#[derive(Debug)]
pub struct Game {
    settings: GameSettings,
    draw_pile: Deck,
    discard_pile: DiscardPile,
    turns: TurnSequencer,
    status: GameStatus,
    winner: Option<PlayerView>,
    events: Rc<EventBus>,
    rng: StdRng,
}

impl Game {
    #[must_use]
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub(crate) fn from_parts(
        settings: GameSettings,
        draw_pile: Deck,
        discard_pile: DiscardPile,
        turns: TurnSequencer,
        events: Rc<EventBus>,
        rng: StdRng,
    ) -> Self {
        Self {
            settings,
            draw_pile,
            discard_pile,
            turns,
            status: GameStatus::InProgress,
            winner: None,
            events,
            rng,
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::Over => Err(GameError::GameOver),
        }
    }

    /// Error unless `player_id` is the player whose turn it is.
    pub fn check_turn(&self, player_id: PlayerId) -> Result<()> {
        if self.turns.find_by_id(player_id).is_none() {
            return Err(GameError::UnknownPlayer(player_id));
        }
        if self.turns.current().id() != player_id {
            return Err(GameError::OutOfTurn(player_id));
        }
        Ok(())
    }

    /// Play `card` from `player_id`'s hand. Wild cards must already be bound
    /// to the color the player picked.
    ///
    /// Turn ownership isn't checked here; see [`Game::check_turn`].
    pub fn play_card(&mut self, player_id: PlayerId, card: Card, said_uno: bool) -> Result<()> {
        self.ensure_in_progress()?;
        let top = *self.discard_pile.top();
        let player = self
            .turns
            .find_by_id_mut(player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        if !player.hand().contains(&card) {
            return Err(GameError::CardNotInHand(card));
        }
        if card.is_wild() && card.color().is_none() {
            return Err(GameError::MissingWildColor);
        }
        if !card.can_play_on(&top) {
            return Err(GameError::IllegalMove { card, top });
        }

        player.remove_card(&card);
        debug!(
            "{} played {card} on {top}, {} left",
            player.name(),
            player.hand().size()
        );
        let winner = player.hand().is_empty().then(|| player.view());
        self.discard_pile.push(card);
        self.events.publish(DomainEvent::new(GameEvent::CardPlayed {
            player_id,
            card,
            said_uno,
        }));

        match winner {
            Some(winner) => self.finish(winner),
            None => self.apply_effect(card.kind()),
        }
        Ok(())
    }

    fn finish(&mut self, winner: PlayerView) {
        info!("{} won the game", winner.name);
        self.status = GameStatus::Over;
        self.winner = Some(winner.clone());
        self.events
            .publish(DomainEvent::new(GameEvent::GameOver { winner }));
    }

    fn apply_effect(&mut self, kind: CardKind) {
        match kind {
            CardKind::Number | CardKind::WildColor => {
                self.turns.next();
            }
            CardKind::Skip => {
                self.turns.next();
                self.turns.next();
            }
            CardKind::Reverse => {
                self.turns.reverse_direction();
                self.turns.next();
            }
            CardKind::DrawTwo => self.force_draw(DRAW_TWO_PENALTY),
            CardKind::WildDrawFour => self.force_draw(WILD_DRAW_FOUR_PENALTY),
        }
    }

    /// The next player draws `count` cards and loses their turn.
    fn force_draw(&mut self, count: usize) {
        let target = self.turns.next().id();
        for drawn in 0..count {
            if let Err(error) = self.deal_to(target) {
                warn!("Skipping {} of {count} penalty draws: {error}", count - drawn);
                break;
            }
        }
        self.turns.next();
    }

    fn deal_to(&mut self, player_id: PlayerId) -> Result<()> {
        let player = self
            .turns
            .find_by_id_mut(player_id)
            .ok_or(GameError::UnknownPlayer(player_id))?;
        let card = self
            .draw_pile
            .draw_recycling(&mut self.discard_pile, &mut self.rng)
            .ok_or(GameError::DeckExhausted)?;
        player.add_card(card);
        debug!("{} drew a card, {} held", player.name(), player.hand().size());
        self.events
            .publish(DomainEvent::new(GameEvent::CardDrawn { player_id }));
        Ok(())
    }

    /// Move the top card of the draw pile into `player_id`'s hand. An empty
    /// draw pile is refilled from the discard pile first. Doesn't end the
    /// player's turn.
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<()> {
        self.ensure_in_progress()?;
        self.deal_to(player_id)
    }

    /// End `player_id`'s turn without playing.
    pub fn pass_turn(&mut self, player_id: PlayerId) -> Result<()> {
        self.ensure_in_progress()?;
        self.check_turn(player_id)?;
        let next = self.turns.next();
        debug!("Turn passed to {}", next.name());
        Ok(())
    }

    pub fn hand_cards(&self, player_id: PlayerId) -> Result<std::slice::Iter<'_, Card>> {
        self.turns
            .find_by_id(player_id)
            .map(|player| player.hand().iter())
            .ok_or(GameError::UnknownPlayer(player_id))
    }

    #[must_use]
    pub const fn peek_top_card(&self) -> Card {
        *self.discard_pile.top()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerInfo {
        self.turns.current().info()
    }

    /// Seating order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerInfo> {
        self.turns.players().iter().map(|player| player.info()).collect()
    }

    pub fn player(&self, player_id: PlayerId) -> Result<PlayerView> {
        self.turns
            .find_by_id(player_id)
            .map(|player| player.view())
            .ok_or(GameError::UnknownPlayer(player_id))
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    #[must_use]
    pub const fn winner(&self) -> Option<&PlayerView> {
        self.winner.as_ref()
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.turns.direction()
    }

    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    #[must_use]
    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Cards across both piles and every hand. Always the size of a full
    /// deck.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        let held: usize = self
            .turns
            .players()
            .iter()
            .map(|player| player.hand().size())
            .sum();
        self.draw_pile.len() + self.discard_pile.len() + held
    }

    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// The session's event bus. Subscribe here to observe moves.
    #[must_use]
    pub const fn events(&self) -> &Rc<EventBus> {
        &self.events
    }
}
