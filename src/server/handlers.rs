//! REST handlers: load, run the engine, save.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, info, instrument, warn};

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::views::{
    EndGameResponse, GameView, MoveRequest, RegisterPlayerRequest, StartGameRequest,
    StartGameResponse,
};
use super::AppState;
use crate::games::tictactoe::{self, EngineError, Move, Position};
use crate::{Player, normalize_phone};

const DEFAULT_PLAYER_NAME: &str = "Player";

/// Runs blocking database work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {}", e)))?
}

/// `POST /api/startgame`
#[instrument(skip_all)]
pub async fn start_game(
    State(state): State<AppState>,
    body: Option<ApiJson<StartGameRequest>>,
) -> Result<(StatusCode, Json<StartGameResponse>), ApiError> {
    // A blank phone number, like a missing one, leaves the game anonymous.
    let owner = body.and_then(|ApiJson(req)| {
        let phone_number = normalize_phone(req.phone_number.as_deref()?);
        (!phone_number.is_empty()).then_some((req.name, phone_number))
    });

    let record = blocking(move || {
        let owner_id = match owner {
            Some((name, phone_number)) => {
                let name = name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
                let player = state.players.register(name, phone_number)?;
                Some(*player.id())
            }
            None => None,
        };
        Ok(state.repository.create_game(owner_id)?)
    })
    .await?;

    info!(game_id = %record.id(), owner_id = ?record.owner_id(), "Game initiated");
    Ok((
        StatusCode::CREATED,
        Json(StartGameResponse {
            success: true,
            message: "Game initiated".to_string(),
            id: record.id().clone(),
        }),
    ))
}

/// `GET /api/getgame/{id}`
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<GameView>, ApiError> {
    let record = blocking(move || {
        state
            .repository
            .load_game(&id)?
            .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))
    })
    .await?;

    Ok(Json(GameView::from(&record)))
}

/// `POST /api/move/{id}`
///
/// Applies the caller's move and, if the game goes on, the automatic
/// opponent's reply, then saves both in one versioned write.
#[instrument(skip(state, req), fields(number = req.number, player = %req.player))]
pub async fn make_move(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    let record = blocking(move || {
        let record = state
            .repository
            .load_game(&id)?
            .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

        if let Some(owner_id) = *record.owner_id() {
            let caller = match req.phone_number.as_deref() {
                Some(phone) => state.players.resolve(phone)?,
                None => None,
            };
            if caller.as_ref().map(Player::id) != Some(&owner_id) {
                warn!(owner_id, "Move by someone other than the game's owner");
                return Err(ApiError::Forbidden(
                    "Only the player who started this game can move".to_string(),
                ));
            }
        }

        if record.state().is_finished() {
            return Err(EngineError::GameOver.into());
        }

        let position = Position::new(req.number)?;
        let mut next = tictactoe::apply_move(record.state(), Move::new(req.player, position))?;
        debug!(status = %next.status(), "Player move applied");

        if !next.is_finished() {
            let mut strategy = state
                .opponent
                .lock()
                .map_err(|_| ApiError::Internal("Opponent lock poisoned".to_string()))?;
            next = tictactoe::system_play(&next, &mut **strategy)?;
            debug!(status = %next.status(), "System move applied");
        }

        Ok(state.repository.save_game(&record.with_state(next))?)
    })
    .await?;

    info!(
        game_id = %record.id(),
        status = %record.state().status(),
        winner = ?record.state().winner().mark(),
        "Move completed"
    );
    Ok(Json(GameView::from(&record)))
}

/// `POST /api/endgame/{id}`
#[instrument(skip(state))]
pub async fn end_game(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<EndGameResponse>, ApiError> {
    let record = blocking(move || {
        let record = state
            .repository
            .load_game(&id)?
            .ok_or_else(|| ApiError::NotFound("Game not found".to_string()))?;

        if record.state().is_finished() {
            return Ok(record);
        }

        let next = tictactoe::end_game(record.state());
        Ok(state.repository.save_game(&record.with_state(next))?)
    })
    .await?;

    info!(game_id = %record.id(), "Game over");
    Ok(Json(EndGameResponse {
        message: "Game Over".to_string(),
        game: GameView::from(&record),
    }))
}

/// `POST /api/players`
#[instrument(skip_all)]
pub async fn register_player(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let player = blocking(move || Ok(state.players.register(req.name, req.phone_number)?)).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// `GET /api/players/{phone}`
#[instrument(skip_all)]
pub async fn get_player(
    State(state): State<AppState>,
    ApiPath(phone): ApiPath<String>,
) -> Result<Json<Player>, ApiError> {
    let player = blocking(move || {
        state
            .players
            .resolve(&phone)?
            .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))
    })
    .await?;

    Ok(Json(player))
}
