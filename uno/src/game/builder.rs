//! Assembles a ready-to-play [`Game`].

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use std::rc::Rc;

use super::{
    constants::DECK_SIZE,
    entities::{Card, Deck, DiscardPile},
    events::EventBus,
    player::{Player, PlayerName},
    state_machine::{Game, GameError, GameSettings, Result},
    turns::TurnSequencer,
};

#[derive(Debug, Default)]
pub struct GameBuilder {
    settings: GameSettings,
    names: Vec<String>,
    deck: Option<Vec<Card>>,
    events: Option<Rc<EventBus>>,
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat another player. Players take turns in the order they're added.
    #[must_use]
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    #[must_use]
    pub fn with_players<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replaces any seed already set through [`GameBuilder::with_settings`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use `cards` as the draw pile instead of a shuffled deck. The first
    /// card is dealt first. Must be a reordering of a standard deck.
    #[must_use]
    pub fn with_deck(mut self, cards: Vec<Card>) -> Self {
        self.deck = Some(cards);
        self
    }

    /// Publish to an existing bus, e.g. one observers already hold.
    #[must_use]
    pub fn with_event_bus(mut self, events: Rc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Result<Game> {
        let Self {
            settings,
            names,
            deck,
            events,
        } = self;
        settings.validate()?;
        if names.len() < settings.min_players {
            return Err(GameError::NotEnoughPlayers);
        }
        if names.len() > settings.max_players {
            return Err(GameError::TooManyPlayers {
                players: names.len(),
                max: settings.max_players,
            });
        }
        let names: Vec<PlayerName> = names.iter().map(|name| PlayerName::new(name)).collect();
        if names.iter().any(PlayerName::is_empty) {
            return Err(GameError::InvalidSettings(
                "player names can't be blank".to_string(),
            ));
        }

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut draw_pile = match deck {
            Some(cards) => {
                if !Deck::is_standard(&cards) {
                    return Err(GameError::InvalidDeck(format!(
                        "expected a reordering of the {DECK_SIZE}-card deck"
                    )));
                }
                Deck::from_draw_order(cards)
            }
            None => Deck::shuffled(&mut rng),
        };

        let mut players: Vec<Player> = names.into_iter().map(Player::new).collect();
        for player in &mut players {
            for _ in 0..settings.hand_size {
                let card = draw_pile.deal_card().ok_or(GameError::DeckExhausted)?;
                player.add_card(card);
            }
        }
        let discard_pile = DiscardPile::new(flip_seed(&mut draw_pile)?);
        debug!("Seeded discard pile with {}", discard_pile.top());

        info!(
            "New game: {} players, {} cards each, {} left to draw",
            players.len(),
            settings.hand_size,
            draw_pile.len()
        );
        let turns = TurnSequencer::new(players)?;
        Ok(Game::from_parts(
            settings,
            draw_pile,
            discard_pile,
            turns,
            events.unwrap_or_default(),
            rng,
        ))
    }
}

/// Flip cards until a non-wild one turns up. Wild cards go back under the
/// pile.
fn flip_seed(draw_pile: &mut Deck) -> Result<Card> {
    for _ in 0..draw_pile.len() {
        let card = draw_pile.deal_card().ok_or(GameError::DeckExhausted)?;
        if !card.is_wild() {
            return Ok(card);
        }
        draw_pile.put_bottom(card);
    }
    Err(GameError::DeckExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        constants::{DEFAULT_HAND_SIZE, MAX_DEALT_CARDS, MAX_PLAYERS, WILD_CARD_COUNT},
        entities::{CardKind, Color},
        events::EventRecorder,
    };

    fn two_players() -> GameBuilder {
        GameBuilder::new().with_players(["alice", "bob"])
    }

    #[test]
    fn test_build_deals_hands() {
        let game = two_players().with_seed(1).build().unwrap();
        for player in game.players() {
            assert_eq!(
                game.hand_cards(player.id).unwrap().count(),
                DEFAULT_HAND_SIZE
            );
        }
        assert_eq!(game.discard_pile_len(), 1);
        assert_eq!(game.draw_pile_len(), DECK_SIZE - 2 * DEFAULT_HAND_SIZE - 1);
        assert!(!game.peek_top_card().is_wild());
        assert_eq!(game.current_player().name.as_str(), "alice");
    }

    #[test]
    fn test_build_same_seed_same_deal() {
        let a = two_players().with_seed(42).build().unwrap();
        let b = two_players().with_seed(42).build().unwrap();
        assert_eq!(a.peek_top_card(), b.peek_top_card());
        let hand = |game: &Game| -> Vec<Card> {
            let first = game.players()[0].id;
            game.hand_cards(first).unwrap().copied().collect()
        };
        assert_eq!(hand(&a), hand(&b));
    }

    #[test]
    fn test_build_not_enough_players() {
        let result = GameBuilder::new().with_player("alice").build();
        assert!(matches!(result, Err(GameError::NotEnoughPlayers)));
    }

    #[test]
    fn test_build_too_many_players() {
        let names = (0..=MAX_PLAYERS).map(|i| format!("player{i}"));
        let result = GameBuilder::new().with_players(names).build();
        assert!(matches!(
            result,
            Err(GameError::TooManyPlayers { players, max }) if players == MAX_PLAYERS + 1 && max == MAX_PLAYERS
        ));
    }

    #[test]
    fn test_build_blank_name() {
        let result = GameBuilder::new().with_players(["alice", "   "]).build();
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_build_invalid_settings() {
        let result = two_players()
            .with_settings(GameSettings::new(0, 2, 4, None))
            .build();
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_build_rejects_short_deck() {
        let mut cards = Deck::standard_cards();
        cards.pop();
        let result = two_players().with_deck(cards).build();
        assert!(matches!(result, Err(GameError::InvalidDeck(_))));
    }

    #[test]
    fn test_build_rejects_bound_wild_in_deck() {
        let mut cards = Deck::standard_cards();
        let last = cards.len() - 1;
        cards[last] = Card::wild_with_color(CardKind::WildDrawFour, Color::Red).unwrap();
        let result = two_players().with_deck(cards).build();
        assert!(matches!(result, Err(GameError::InvalidDeck(_))));
    }

    #[test]
    fn test_stacked_deck_deals_in_order() {
        let cards = Deck::standard_cards();
        let game = two_players()
            .with_settings(GameSettings::new(3, 2, 4, None))
            .with_deck(cards.clone())
            .build()
            .unwrap();
        let players = game.players();
        let first: Vec<Card> = game.hand_cards(players[0].id).unwrap().copied().collect();
        let second: Vec<Card> = game.hand_cards(players[1].id).unwrap().copied().collect();
        assert_eq!(first, cards[0..3]);
        assert_eq!(second, cards[3..6]);
        assert_eq!(game.peek_top_card(), cards[6]);
    }

    #[test]
    fn test_wild_seed_goes_under_pile() {
        let mut cards = Deck::standard_cards();
        let wild = cards.pop().unwrap();
        assert!(wild.is_wild());
        // Put a wild card right where the seed gets flipped.
        cards.insert(2, wild);
        let game = two_players()
            .with_settings(GameSettings::new(1, 2, 4, None))
            .with_deck(cards.clone())
            .build()
            .unwrap();
        assert_eq!(game.peek_top_card(), cards[3]);
        assert_eq!(game.total_cards(), DECK_SIZE);
    }

    #[test]
    fn test_largest_deal_still_seeds() {
        // Every wild is left over and flipped before the last number card.
        let cards = Deck::standard_cards();
        let (mut stacked, wilds): (Vec<Card>, Vec<Card>) =
            cards.into_iter().partition(|card| !card.is_wild());
        let last = stacked.pop().unwrap();
        stacked.extend(wilds);
        stacked.push(last);

        let settings = GameSettings::new(MAX_DEALT_CARDS / 3, 2, 3, None);
        assert!(settings.validate().is_ok());
        let game = GameBuilder::new()
            .with_players(["alice", "bob", "carol"])
            .with_settings(settings)
            .with_deck(stacked)
            .build()
            .unwrap();
        assert_eq!(game.peek_top_card(), last);
        assert_eq!(game.draw_pile_len(), WILD_CARD_COUNT);
        assert_eq!(game.total_cards(), DECK_SIZE);
    }

    #[test]
    fn test_build_rejects_deal_that_could_strand_wilds() {
        let result = two_players()
            .with_settings(GameSettings::new(53, 2, 2, None))
            .with_deck(Deck::standard_cards())
            .build();
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_shared_event_bus() {
        let bus = Rc::new(EventBus::new());
        let recorder = Rc::new(EventRecorder::new());
        bus.subscribe(recorder.clone());

        let mut game = two_players()
            .with_seed(3)
            .with_event_bus(Rc::clone(&bus))
            .build()
            .unwrap();
        assert!(Rc::ptr_eq(game.events(), &bus));

        let alice = game.current_player().id;
        game.draw_card(alice).unwrap();
        assert_eq!(recorder.len(), 1);
    }
}
