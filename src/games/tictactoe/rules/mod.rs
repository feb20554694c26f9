//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board), kept apart from state
//! transitions so the engine and the opponent share one definition of
//! a finished game.

mod draw;
mod win;

pub use draw::{check_draw, is_full};
pub use win::{LINES, check_winner};
