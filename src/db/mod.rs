//! Database persistence for games and players.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameRecord, NewPlayer, Player};
pub use repository::GameRepository;
