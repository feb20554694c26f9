//! Database models and their domain conversions.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};
use crate::games::tictactoe::{Board, GameState, GameStatus, Mark, Winner, is_consistent};

/// Registered player, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::players)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: i32,
    name: String,
    phone_number: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable player model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    name: String,
    phone_number: String,
}

/// Raw `games` row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
pub(crate) struct GameRow {
    pub(crate) id: String,
    pub(crate) owner_id: Option<i32>,
    pub(crate) board: String,
    pub(crate) current_player: String,
    pub(crate) status: String,
    pub(crate) winner: Option<String>,
    pub(crate) version: i32,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: NaiveDateTime,
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::games)]
pub(crate) struct NewGameRow {
    pub(crate) id: String,
    pub(crate) owner_id: Option<i32>,
    pub(crate) board: String,
    pub(crate) current_player: String,
    pub(crate) status: String,
    pub(crate) winner: Option<String>,
    pub(crate) version: i32,
}

/// Encoded state columns, shared by insert and update.
#[derive(Debug, Clone)]
pub(crate) struct StateColumns {
    pub(crate) board: String,
    pub(crate) current_player: String,
    pub(crate) status: String,
    pub(crate) winner: Option<String>,
}

impl StateColumns {
    #[instrument(skip(state))]
    pub(crate) fn encode(state: &GameState) -> Result<Self, DbError> {
        let board = serde_json::to_string(state.board())
            .map_err(|e| DbError::new(format!("Failed to encode board: {}", e)))?;
        Ok(Self {
            board,
            current_player: state.current_player().to_string(),
            status: state.status().to_string(),
            winner: state.winner().mark().map(|m| m.to_string()),
        })
    }
}

/// A stored game: its state plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameRecord {
    id: String,
    owner_id: Option<i32>,
    state: GameState,
    version: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRecord {
    /// Same record carrying a new state, to be passed to
    /// [`GameRepository::save_game`](crate::GameRepository::save_game).
    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = state;
        self
    }
}

fn corrupt(id: &str, what: &str, value: &str) -> DbError {
    DbError::with_kind(
        DbErrorKind::Corrupt,
        format!("Game '{}' has invalid {}: '{}'", id, what, value),
    )
}

impl TryFrom<GameRow> for GameRecord {
    type Error = DbError;

    #[instrument(skip(row), fields(game_id = %row.id))]
    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let board: Board =
            serde_json::from_str(&row.board).map_err(|_| corrupt(&row.id, "board", &row.board))?;
        let current_player: Mark = row
            .current_player
            .parse()
            .map_err(|_| corrupt(&row.id, "current player", &row.current_player))?;
        let status: GameStatus = row
            .status
            .parse()
            .map_err(|_| corrupt(&row.id, "status", &row.status))?;
        let winner = match row.winner.as_deref() {
            None => Winner::Nobody,
            Some(s) => Winner::Mark(s.parse().map_err(|_| corrupt(&row.id, "winner", s))?),
        };

        let state = GameState::new(board, current_player, status, winner);
        if !is_consistent(&state) {
            return Err(corrupt(&row.id, "state for board", &row.board));
        }

        Ok(Self {
            state,
            id: row.id,
            owner_id: row.owner_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
