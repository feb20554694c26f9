//! REST transport for the game engine.
//!
//! Each route loads a game, runs one engine operation and saves the
//! result. Concurrent moves on the same game are serialized by the
//! repository's version check; the losing request gets `409 Conflict`.

mod error;
mod extract;
mod handlers;
mod views;

pub use error::ApiError;
pub use views::{
    EndGameResponse, GameView, MoveRequest, RegisterPlayerRequest, StartGameRequest,
    StartGameResponse,
};

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tracing::{info, instrument};

use crate::games::tictactoe::{OpponentPolicy, OpponentStrategy};
use crate::{GameRepository, PlayerService};

/// Automatic opponent shared by every game; a seeded random policy draws
/// from one stream for the life of the server.
type SharedOpponent = Arc<Mutex<Box<dyn OpponentStrategy + Send>>>;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repository: GameRepository,
    players: PlayerService,
    opponent: SharedOpponent,
}

impl AppState {
    /// Creates handler state around a repository.
    #[instrument(skip(repository))]
    pub fn new(
        repository: GameRepository,
        opponent: OpponentPolicy,
        opponent_seed: Option<u64>,
    ) -> Self {
        info!(%opponent, seeded = opponent_seed.is_some(), "Creating server state");
        Self {
            players: PlayerService::new(repository.clone()),
            repository,
            opponent: Arc::new(Mutex::new(opponent.strategy(opponent_seed))),
        }
    }
}

/// Builds the `/api` router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/startgame", post(handlers::start_game))
        .route("/move/{id}", post(handlers::make_move))
        .route("/endgame/{id}", post(handlers::end_game))
        .route("/getgame/{id}", get(handlers::get_game))
        .route("/players", post(handlers::register_player))
        .route("/players/{phone}", get(handlers::get_player));

    Router::new()
        .nest("/api", api)
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}
