//! Players, their hands, and the read-only snapshots handed out to callers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{constants, entities::Card};

/// Opaque, unique player identity.
pub type PlayerId = Uuid;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: &str) -> Self {
        let name: String = s
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .take(constants::MAX_NAME_LENGTH)
            .collect();
        Self(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for PlayerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for PlayerName {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Cards held by one player. Order only matters for presentation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the first card matching `card` (see [`Card::matches`]).
    /// Returns whether a card was removed.
    pub fn remove(&mut self, card: &Card) -> bool {
        match self.cards.iter().position(|held| card.matches(held)) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.iter().any(|held| card.matches(held))
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: PlayerName,
    hand: Hand,
}

impl Player {
    #[must_use]
    pub fn new(name: PlayerName) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            hand: Hand::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &PlayerName {
        &self.name
    }

    #[must_use]
    pub const fn hand(&self) -> &Hand {
        &self.hand
    }

    // Hands only change through the engine.
    pub(crate) fn add_card(&mut self, card: Card) {
        self.hand.add(card);
    }

    pub(crate) fn remove_card(&mut self, card: &Card) -> bool {
        self.hand.remove(card)
    }

    #[must_use]
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
        }
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            cards: self.hand.iter().copied().collect(),
        }
    }
}

/// Player identity without the hand.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: PlayerName,
}

impl fmt::Display for PlayerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Detached copy of a player, hand included. Mutating it never touches the
/// game it was taken from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: PlayerName,
    pub cards: Vec<Card>,
}

impl PlayerView {
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{CardKind, Color};

    fn blue(value: u8) -> Card {
        Card::number(value, Color::Blue).unwrap()
    }

    // === PlayerName Tests ===

    #[test]
    fn test_player_name_trims() {
        assert_eq!(PlayerName::new("  alice \n").as_str(), "alice");
    }

    #[test]
    fn test_player_name_truncates() {
        let long = "x".repeat(constants::MAX_NAME_LENGTH * 2);
        assert_eq!(
            PlayerName::new(&long).as_str().chars().count(),
            constants::MAX_NAME_LENGTH
        );
    }

    #[test]
    fn test_player_name_flattens_whitespace() {
        assert_eq!(PlayerName::new("ann\tlee").as_str(), "ann lee");
    }

    #[test]
    fn test_player_name_unicode() {
        assert_eq!(PlayerName::new("Jürgen").to_string(), "Jürgen");
    }

    #[test]
    fn test_player_name_deserialize_sanitizes() {
        let name: PlayerName = serde_json::from_str("\"  bob  \"").unwrap();
        assert_eq!(name.as_str(), "bob");
    }

    // === Hand Tests ===

    #[test]
    fn test_hand_add_and_size() {
        let mut hand = Hand::new();
        assert!(hand.is_empty());
        hand.add(blue(1));
        hand.add(blue(1));
        assert_eq!(hand.size(), 2);
    }

    #[test]
    fn test_hand_remove_one_copy() {
        let mut hand: Hand = [blue(1), blue(1), blue(2)].into_iter().collect();
        assert!(hand.remove(&blue(1)));
        assert_eq!(hand.size(), 2);
        assert!(hand.contains(&blue(1)));
    }

    #[test]
    fn test_hand_remove_missing() {
        let mut hand: Hand = [blue(1)].into_iter().collect();
        assert!(!hand.remove(&blue(2)));
        assert!(!hand.remove(&Card::number(1, Color::Red).unwrap()));
        assert_eq!(hand.size(), 1);
    }

    #[test]
    fn test_hand_wild_lookup_ignores_color() {
        let mut hand: Hand = [Card::wild(CardKind::WildColor).unwrap()]
            .into_iter()
            .collect();
        for color in Color::ALL {
            let bound = Card::wild_with_color(CardKind::WildColor, color).unwrap();
            assert!(hand.contains(&bound));
        }
        let bound = Card::wild_with_color(CardKind::WildColor, Color::Green).unwrap();
        assert!(hand.remove(&bound));
        assert!(hand.is_empty());
    }

    #[test]
    fn test_hand_wild_lookup_bound_held() {
        let held = Card::wild_with_color(CardKind::WildDrawFour, Color::Red).unwrap();
        let hand: Hand = [held].into_iter().collect();
        assert!(hand.contains(&Card::wild(CardKind::WildDrawFour).unwrap()));
        assert!(!hand.contains(&Card::wild(CardKind::WildColor).unwrap()));
    }

    #[test]
    fn test_hand_iter_keeps_order() {
        let hand: Hand = [blue(3), blue(1), blue(2)].into_iter().collect();
        let values: Vec<_> = hand.iter().filter_map(Card::value).collect();
        assert_eq!(values, vec![3, 1, 2]);
    }

    // === Player Tests ===

    #[test]
    fn test_player_new() {
        let player = Player::new("alice".into());
        assert_eq!(player.name().as_str(), "alice");
        assert!(player.hand().is_empty());
    }

    #[test]
    fn test_player_ids_unique() {
        let a = Player::new("a".into());
        let b = Player::new("a".into());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_player_view_is_detached() {
        let mut player = Player::new("alice".into());
        player.add_card(blue(4));
        let mut view = player.view();
        view.cards.clear();
        assert_eq!(player.hand().size(), 1);
        assert_eq!(player.view().total_cards(), 1);
    }

    #[test]
    fn test_player_info() {
        let player = Player::new("carol".into());
        let info = player.info();
        assert_eq!(info.id, player.id());
        assert_eq!(info.to_string(), "carol");
    }
}
