//! Deck composition and table limits.

/// Number of cards in a standard UNO deck.
pub const DECK_SIZE: usize = 108;

/// Wild and wild draw four cards in a standard deck.
pub const WILD_CARD_COUNT: usize = 8;

/// Most cards a full table may be dealt. Whatever is left must include a
/// non-wild card to seed the discard pile, even if every wild stays behind.
pub const MAX_DEALT_CARDS: usize = DECK_SIZE - WILD_CARD_COUNT - 1;

/// Cards dealt to every player when a game is built.
pub const DEFAULT_HAND_SIZE: usize = 7;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

/// Player names are truncated to this many characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Highest face value printed on a number card.
pub const MAX_CARD_VALUE: u8 = 9;

pub const DRAW_TWO_PENALTY: usize = 2;
pub const WILD_DRAW_FOUR_PENALTY: usize = 4;
