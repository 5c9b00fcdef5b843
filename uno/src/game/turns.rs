//! Circular turn order with a reversible direction.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    player::{Player, PlayerId},
    state_machine::GameError,
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
        };
        write!(f, "{repr}")
    }
}

/// Seating order of a game. `current` always indexes a seated player.
#[derive(Clone, Debug)]
pub struct TurnSequencer {
    players: Vec<Player>,
    current: usize,
    direction: Direction,
}

impl TurnSequencer {
    pub fn new(players: Vec<Player>) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::NotEnoughPlayers);
        }
        Ok(Self {
            players,
            current: 0,
            direction: Direction::default(),
        })
    }

    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current]
    }

    /// Move to the next seat in the current direction and return its player.
    pub fn next(&mut self) -> &Player {
        let n = self.players.len();
        self.current = match self.direction {
            Direction::Clockwise => (self.current + 1) % n,
            Direction::CounterClockwise => (n + self.current - 1) % n,
        };
        self.current()
    }

    /// Flip the direction. The current seat doesn't move.
    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.reversed();
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn find_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id() == id)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(n: usize) -> TurnSequencer {
        let players = (0..n)
            .map(|i| Player::new(format!("player{i}").into()))
            .collect();
        TurnSequencer::new(players).unwrap()
    }

    fn ids(turns: &TurnSequencer) -> Vec<PlayerId> {
        turns.players().iter().map(Player::id).collect()
    }

    #[test]
    fn test_empty_sequencer_rejected() {
        assert_eq!(
            TurnSequencer::new(Vec::new()).unwrap_err(),
            GameError::NotEnoughPlayers
        );
    }

    #[test]
    fn test_starts_with_first_player_clockwise() {
        let turns = seat(3);
        assert_eq!(turns.current().id(), ids(&turns)[0]);
        assert_eq!(turns.direction(), Direction::Clockwise);
    }

    #[test]
    fn test_next_clockwise() {
        let mut turns = seat(3);
        let ids = ids(&turns);
        assert_eq!(turns.next().id(), ids[1]);
        assert_eq!(turns.next().id(), ids[2]);
        assert_eq!(turns.next().id(), ids[0]);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        for n in 1..=6 {
            let mut turns = seat(n);
            let start = turns.current().id();
            for _ in 0..n {
                turns.next();
            }
            assert_eq!(turns.current().id(), start);

            turns.reverse_direction();
            for _ in 0..n {
                turns.next();
            }
            assert_eq!(turns.current().id(), start);
        }
    }

    #[test]
    fn test_reverse_then_next_yields_previous_player() {
        let mut turns = seat(4);
        let ids = ids(&turns);
        turns.next();
        turns.next();
        assert_eq!(turns.current().id(), ids[2]);

        turns.reverse_direction();
        assert_eq!(turns.current().id(), ids[2]);
        assert_eq!(turns.next().id(), ids[1]);
    }

    #[test]
    fn test_counter_clockwise_wraps_from_zero() {
        let mut turns = seat(3);
        let ids = ids(&turns);
        turns.reverse_direction();
        assert_eq!(turns.next().id(), ids[2]);
        assert_eq!(turns.next().id(), ids[1]);
        assert_eq!(turns.next().id(), ids[0]);
    }

    #[test]
    fn test_double_reverse_restores_direction() {
        let mut turns = seat(2);
        turns.reverse_direction();
        turns.reverse_direction();
        assert_eq!(turns.direction(), Direction::Clockwise);
    }

    #[test]
    fn test_find_by_id() {
        let mut turns = seat(3);
        let ids = ids(&turns);
        assert_eq!(turns.find_by_id(ids[1]).map(Player::id), Some(ids[1]));
        assert!(turns.find_by_id(PlayerId::new_v4()).is_none());
        assert!(turns.find_by_id_mut(ids[2]).is_some());
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Clockwise.to_string(), "clockwise");
        assert_eq!(
            Direction::CounterClockwise.reversed(),
            Direction::Clockwise
        );
    }
}
