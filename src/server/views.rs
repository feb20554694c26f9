//! Request and response bodies of the REST API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::GameRecord;
use crate::games::tictactoe::{Board, GameStatus, Mark, Winner};

/// Body of `POST /api/startgame`.
///
/// Omitting the body, or the phone number, starts an anonymous game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    /// Display name used if the phone number is not registered yet.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number identifying the player who owns the game.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Response of `POST /api/startgame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGameResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Id of the new game.
    pub id: String,
}

/// Body of `POST /api/move/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Position 1-9.
    pub number: i64,
    /// Mark the caller plays; the human side is X unless stated.
    #[serde(default = "human_mark")]
    pub player: Mark,
    /// Caller's phone number, required for games with an owner.
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn human_mark() -> Mark {
    Mark::X
}

/// Body of `POST /api/players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPlayerRequest {
    /// Display name.
    pub name: String,
    /// Phone number, the player's external identity.
    pub phone_number: String,
}

/// Game as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Game id.
    pub id: String,
    /// Board rows.
    pub board: Board,
    /// Mark to move next.
    pub current_player: Mark,
    /// `playing` or `finished`.
    pub status: GameStatus,
    /// Winning mark, `null` for draws and unfinished games.
    pub winner: Winner,
    /// Owning player id, if any.
    pub owner_id: Option<i32>,
    /// Optimistic-lock version.
    pub version: i32,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
    /// Last update time (UTC).
    pub updated_at: NaiveDateTime,
}

impl From<&GameRecord> for GameView {
    fn from(record: &GameRecord) -> Self {
        let state = record.state();
        Self {
            id: record.id().clone(),
            board: state.board().clone(),
            current_player: *state.current_player(),
            status: *state.status(),
            winner: *state.winner(),
            owner_id: *record.owner_id(),
            version: *record.version(),
            created_at: *record.created_at(),
            updated_at: *record.updated_at(),
        }
    }
}

/// Response of `POST /api/endgame/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndGameResponse {
    /// Always "Game Over".
    pub message: String,
    /// The finished game.
    pub game: GameView,
}
