//! Move selection for the automatic opponent.

use super::{Board, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Picks a square for the automatic opponent.
///
/// Implementations may carry state across calls, such as a random number
/// stream, so one instance should serve a whole run of the service.
pub trait OpponentStrategy: std::fmt::Debug {
    /// Chooses an empty square, or `None` when the board is full.
    fn choose(&mut self, board: &Board) -> Option<Position>;
}

/// Takes the first empty square in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEmpty;

impl OpponentStrategy for FirstEmpty {
    #[instrument(skip_all)]
    fn choose(&mut self, board: &Board) -> Option<Position> {
        Position::ALL.into_iter().find(|pos| board.is_empty(*pos))
    }
}

/// Picks uniformly among the empty squares.
#[derive(Debug, Clone)]
pub struct RandomEmpty {
    rng: StdRng,
}

impl RandomEmpty {
    /// Seeded for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl OpponentStrategy for RandomEmpty {
    #[instrument(skip_all)]
    fn choose(&mut self, board: &Board) -> Option<Position> {
        board.empty_positions().choose(&mut self.rng).copied()
    }
}

/// Named opponent policy, selectable from configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OpponentPolicy {
    /// [`FirstEmpty`].
    #[default]
    FirstEmpty,
    /// [`RandomEmpty`].
    Random,
}

impl OpponentPolicy {
    /// Builds the strategy for this policy.
    ///
    /// A seed makes a [`OpponentPolicy::Random`] stream reproducible; it is
    /// ignored by the deterministic policy.
    #[instrument]
    pub fn strategy(self, seed: Option<u64>) -> Box<dyn OpponentStrategy + Send> {
        match self {
            OpponentPolicy::FirstEmpty => Box::new(FirstEmpty),
            OpponentPolicy::Random => match seed {
                Some(seed) => Box::new(RandomEmpty::seeded(seed)),
                None => Box::new(RandomEmpty::from_entropy()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Mark, Square};

    #[test]
    fn test_first_empty_scans_row_major() {
        let mut board = Board::new();
        board.set(Position::TOP_LEFT, Square::Occupied(Mark::X));
        assert_eq!(FirstEmpty.choose(&board), Position::new(2).ok());
    }

    #[test]
    fn test_first_empty_full_board() {
        let mut board = Board::new();
        for pos in Position::ALL {
            board.set(pos, Square::Occupied(Mark::O));
        }
        assert_eq!(FirstEmpty.choose(&board), None);
    }

    #[test]
    fn test_random_picks_only_empty_squares() {
        let mut board = Board::new();
        for pos in &Position::ALL[..7] {
            board.set(*pos, Square::Occupied(Mark::X));
        }
        let mut strategy = RandomEmpty::seeded(7);
        for _ in 0..20 {
            let pos = strategy.choose(&board).unwrap();
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let board = Board::new();
        let a: Vec<_> = {
            let mut s = RandomEmpty::seeded(42);
            (0..5).map(|_| s.choose(&board)).collect()
        };
        let b: Vec<_> = {
            let mut s = RandomEmpty::seeded(42);
            (0..5).map(|_| s.choose(&board)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("random".parse::<OpponentPolicy>().unwrap(), OpponentPolicy::Random);
        assert_eq!(OpponentPolicy::FirstEmpty.to_string(), "first-empty");
    }
}
