use log::warn;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{fmt, mem, str::FromStr};
use thiserror::Error;

use super::constants::{DECK_SIZE, MAX_CARD_VALUE};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Self::Red),
            "green" | "g" => Ok(Self::Green),
            "blue" | "b" => Ok(Self::Blue),
            "yellow" | "y" => Ok(Self::Yellow),
            _ => Err(ValidationError::Unparsable(s.to_string())),
        }
    }
}

/// What is printed on the face of a card, independent of its color.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CardKind {
    Number,
    Skip,
    Reverse,
    DrawTwo,
    WildColor,
    WildDrawFour,
}

impl CardKind {
    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, Self::WildColor | Self::WildDrawFour)
    }

    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(self, Self::Skip | Self::Reverse | Self::DrawTwo)
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Number => "number",
            Self::Skip => "skip",
            Self::Reverse => "reverse",
            Self::DrawTwo => "draw two",
            Self::WildColor => "wild",
            Self::WildDrawFour => "wild draw four",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for number card values.
pub type Value = u8;

/// Errors raised while building or parsing a card.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("{kind} cards need a color")]
    MissingColor { kind: CardKind },
    #[error("number cards need a value")]
    MissingValue,
    #[error("{kind} cards don't carry a value")]
    UnexpectedValue { kind: CardKind },
    #[error("card value {0} is outside 0..=9")]
    ValueOutOfRange(Value),
    #[error("{0} is not an action card")]
    NotAnAction(CardKind),
    #[error("{0} is not a wild card")]
    NotWild(CardKind),
    #[error("can't read {0:?} as a card")]
    Unparsable(String),
}

/// A single card.
///
/// Number and action cards always carry a color. Wild cards are colorless
/// while they sit in the deck or in a hand, and get bound to a color with
/// [`Card::bind_color`] when they're played.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "CardRepr", into = "CardRepr")]
pub struct Card {
    kind: CardKind,
    color: Option<Color>,
    value: Option<Value>,
}

// Deserialized cards go through the same validation as constructed ones.
#[derive(Clone, Copy, Deserialize, Serialize)]
struct CardRepr {
    kind: CardKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl TryFrom<CardRepr> for Card {
    type Error = ValidationError;

    fn try_from(repr: CardRepr) -> Result<Self, Self::Error> {
        Self::new(repr.kind, repr.color, repr.value)
    }
}

impl From<Card> for CardRepr {
    fn from(card: Card) -> Self {
        Self {
            kind: card.kind,
            color: card.color,
            value: card.value,
        }
    }
}

impl Card {
    /// Validate a kind/color/value combination and build the card.
    pub fn new(
        kind: CardKind,
        color: Option<Color>,
        value: Option<Value>,
    ) -> Result<Self, ValidationError> {
        match kind {
            CardKind::Number => {
                let value = value.ok_or(ValidationError::MissingValue)?;
                if value > MAX_CARD_VALUE {
                    return Err(ValidationError::ValueOutOfRange(value));
                }
                if color.is_none() {
                    return Err(ValidationError::MissingColor { kind });
                }
            }
            _ if value.is_some() => return Err(ValidationError::UnexpectedValue { kind }),
            CardKind::Skip | CardKind::Reverse | CardKind::DrawTwo if color.is_none() => {
                return Err(ValidationError::MissingColor { kind });
            }
            _ => {}
        }
        Ok(Self::raw(kind, color, value))
    }

    const fn raw(kind: CardKind, color: Option<Color>, value: Option<Value>) -> Self {
        Self { kind, color, value }
    }

    pub fn number(value: Value, color: Color) -> Result<Self, ValidationError> {
        Self::new(CardKind::Number, Some(color), Some(value))
    }

    pub fn action(kind: CardKind, color: Color) -> Result<Self, ValidationError> {
        if !kind.is_action() {
            return Err(ValidationError::NotAnAction(kind));
        }
        Self::new(kind, Some(color), None)
    }

    /// A colorless wild card, as found in the deck.
    pub fn wild(kind: CardKind) -> Result<Self, ValidationError> {
        if !kind.is_wild() {
            return Err(ValidationError::NotWild(kind));
        }
        Self::new(kind, None, None)
    }

    /// A wild card already bound to the color its player picked.
    pub fn wild_with_color(kind: CardKind, color: Color) -> Result<Self, ValidationError> {
        Self::wild(kind)?.bind_color(color)
    }

    /// Return this wild card bound to `color`.
    pub fn bind_color(self, color: Color) -> Result<Self, ValidationError> {
        if !self.is_wild() {
            return Err(ValidationError::NotWild(self.kind));
        }
        Ok(Self {
            color: Some(color),
            ..self
        })
    }

    /// Strip the bound color off a wild card. Other cards are returned as is.
    #[must_use]
    pub const fn unbound(self) -> Self {
        if self.kind.is_wild() {
            Self::raw(self.kind, None, None)
        } else {
            self
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CardKind {
        self.kind
    }

    #[must_use]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    /// Face value, only defined for number cards.
    #[must_use]
    pub const fn value(&self) -> Option<Value> {
        self.value
    }

    #[must_use]
    pub const fn is_wild(&self) -> bool {
        self.kind.is_wild()
    }

    /// Equality used when looking a card up in a hand. Wild cards compare
    /// by kind only so a color-bound play finds the colorless card held.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        if self.is_wild() {
            self.kind == other.kind
        } else {
            self == other
        }
    }

    /// Whether this card may be played on top of `top`.
    #[must_use]
    pub fn can_play_on(&self, top: &Self) -> bool {
        if self.is_wild() {
            return true;
        }
        if self.color.is_some() && self.color == top.color {
            return true;
        }
        match (self.kind, top.kind) {
            (CardKind::Number, CardKind::Number) => self.value == top.value,
            (kind, top_kind) => kind == top_kind && kind.is_action(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.kind, self.color, self.value) {
            (CardKind::Number, Some(color), Some(value)) => write!(f, "{color} {value}"),
            (kind, Some(color), _) if kind.is_wild() => write!(f, "{kind} ({color})"),
            (kind, Some(color), _) => write!(f, "{color} {kind}"),
            (kind, None, _) => write!(f, "{kind}"),
        }
    }
}

fn parse_face(face: &str) -> Option<(CardKind, Option<Value>)> {
    match face {
        "skip" | "s" => Some((CardKind::Skip, None)),
        "reverse" | "rev" | "r" => Some((CardKind::Reverse, None)),
        "drawtwo" | "draw2" | "d2" | "+2" => Some((CardKind::DrawTwo, None)),
        digits if digits.starts_with(|c: char| c.is_ascii_digit()) => digits
            .parse::<Value>()
            .ok()
            .map(|value| (CardKind::Number, Some(value))),
        _ => None,
    }
}

fn parse_wild_face(face: &str) -> Option<CardKind> {
    match face {
        "wild" | "w" => Some(CardKind::WildColor),
        "wilddrawfour" | "wild4" | "wild+4" | "w4" | "w+4" | "+4" | "drawfour" => {
            Some(CardKind::WildDrawFour)
        }
        _ => None,
    }
}

fn parse_wild(words: &[&str]) -> Option<Result<Card, ValidationError>> {
    let (face_words, color) = match words.split_last() {
        Some((last, init)) if !init.is_empty() => match last.parse::<Color>() {
            Ok(color) => (init, Some(color)),
            Err(_) => (words, None),
        },
        _ => (words, None),
    };
    let kind = parse_wild_face(&face_words.concat())?;
    Some(Card::new(kind, color, None))
}

/// Reads the forms produced by `Display` (`red 7`, `blue draw two`,
/// `wild draw four (green)`) as well as short ones (`r7`, `g+2`, `w4 blue`).
impl FromStr for Card {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || ValidationError::Unparsable(s.to_string());
        let cleaned = s
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | ','))
            .collect::<String>()
            .to_ascii_lowercase();
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        if let Some(wild) = parse_wild(&words) {
            return wild;
        }

        let (color, face) = match words.as_slice() {
            [] => return Err(unparsable()),
            [compact] => {
                let first = compact.chars().next().ok_or_else(unparsable)?;
                let color = first.to_string().parse::<Color>()?;
                (color, compact[first.len_utf8()..].to_string())
            }
            [color, face @ ..] => (color.parse::<Color>()?, face.concat()),
        };
        let (kind, value) = parse_face(&face).ok_or_else(unparsable)?;
        Self::new(kind, Some(color), value)
    }
}

/// The draw pile. The last card of the inner vector is the top of the pile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: Self::standard_cards(),
        }
    }
}

impl Deck {
    /// The 108 cards of a standard deck, in a fixed order: per color one 0
    /// and two of each 1-9, then two of each action per color, then four of
    /// each wild card.
    #[must_use]
    pub fn standard_cards() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for color in Color::ALL {
            cards.push(Card::raw(CardKind::Number, Some(color), Some(0)));
            for value in 1..=MAX_CARD_VALUE {
                for _ in 0..2 {
                    cards.push(Card::raw(CardKind::Number, Some(color), Some(value)));
                }
            }
        }
        for color in Color::ALL {
            for _ in 0..2 {
                for kind in [CardKind::Skip, CardKind::Reverse, CardKind::DrawTwo] {
                    cards.push(Card::raw(kind, Some(color), None));
                }
            }
        }
        for _ in 0..4 {
            cards.push(Card::raw(CardKind::WildColor, None, None));
            cards.push(Card::raw(CardKind::WildDrawFour, None, None));
        }
        cards
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    /// Build a pile from cards listed in the order they'll be drawn.
    #[must_use]
    pub fn from_draw_order(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self { cards }
    }

    /// Whether `cards` is exactly the standard 108-card multiset, with every
    /// wild card colorless.
    #[must_use]
    pub fn is_standard(cards: &[Card]) -> bool {
        if cards.len() != DECK_SIZE {
            return false;
        }
        let mut given = cards.to_vec();
        given.sort_unstable();
        let mut expected = Self::standard_cards();
        expected.sort_unstable();
        given == expected
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn put_bottom(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Add `cards` to the pile and reshuffle it.
    pub fn recycle<R: Rng + ?Sized>(&mut self, cards: Vec<Card>, rng: &mut R) {
        self.cards.extend(cards);
        self.shuffle(rng);
    }

    /// Deal the top card, first refilling an empty pile from everything on
    /// the discard pile except its top card.
    pub fn draw_recycling<R: Rng + ?Sized>(
        &mut self,
        discard_pile: &mut DiscardPile,
        rng: &mut R,
    ) -> Option<Card> {
        if self.cards.is_empty() {
            let recycled = discard_pile.take_recyclable();
            if !recycled.is_empty() {
                warn!(
                    "Draw pile empty, reshuffling {} discarded cards",
                    recycled.len()
                );
                self.recycle(recycled, rng);
            }
        }
        self.deal_card()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().rev()
    }
}

/// Played cards. The pile is never empty: `top` is the active card every
/// play is checked against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscardPile {
    top: Card,
    below: Vec<Card>,
}

#[allow(clippy::len_without_is_empty)]
impl DiscardPile {
    #[must_use]
    pub fn new(top: Card) -> Self {
        Self {
            top,
            below: Vec::new(),
        }
    }

    #[must_use]
    pub const fn top(&self) -> &Card {
        &self.top
    }

    pub fn push(&mut self, card: Card) {
        let previous = mem::replace(&mut self.top, card);
        self.below.push(previous);
    }

    /// Take every card under the top, with wild cards returned to their
    /// colorless state.
    pub fn take_recyclable(&mut self) -> Vec<Card> {
        self.below.drain(..).map(Card::unbound).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.below.len() + 1
    }
}
