//! Database repository for games and players.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info, instrument, warn};

use crate::db::models::{GameRow, NewGameRow, StateColumns};
use crate::db::{DbError, DbErrorKind, GameRecord, NewPlayer, Player, schema};
use crate::games::tictactoe::GameState;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Length of generated game ids.
pub const GAME_ID_LEN: usize = 8;

const ID_ATTEMPTS: usize = 3;

/// Database repository for game and player operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// Every operation opens its own connection, so `":memory:"` would give
    /// each call a fresh empty database; tests use a temporary file instead.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Registers a new player.
    ///
    /// # Errors
    ///
    /// Returns a [`DbErrorKind::Conflict`] error if the phone number is taken.
    #[instrument(skip(self))]
    pub fn create_player(&self, name: String, phone_number: String) -> Result<Player, DbError> {
        debug!("Creating player");
        let mut conn = self.connection()?;

        let player = diesel::insert_into(schema::players::table)
            .values(&NewPlayer::new(name, phone_number))
            .returning(Player::as_returning())
            .get_result(&mut conn)?;

        info!(player_id = player.id(), "Player created");
        Ok(player)
    }

    /// Looks up a player by phone number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_player_by_phone(&self, phone_number: &str) -> Result<Option<Player>, DbError> {
        let mut conn = self.connection()?;

        let player = schema::players::table
            .filter(schema::players::phone_number.eq(phone_number))
            .select(Player::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = player.is_some(), "Player lookup by phone");
        Ok(player)
    }

    /// Creates a game in its initial state, optionally owned by a player.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or no unused id was
    /// found.
    #[instrument(skip(self))]
    pub fn create_game(&self, owner_id: Option<i32>) -> Result<GameRecord, DbError> {
        let mut conn = self.connection()?;
        let columns = StateColumns::encode(&GameState::start())?;

        for attempt in 1..=ID_ATTEMPTS {
            let row = NewGameRow {
                id: generate_game_id(),
                owner_id,
                board: columns.board.clone(),
                current_player: columns.current_player.clone(),
                status: columns.status.clone(),
                winner: columns.winner.clone(),
                version: 0,
            };

            let inserted = diesel::insert_into(schema::games::table)
                .values(&row)
                .returning(GameRow::as_returning())
                .get_result(&mut conn)
                .map_err(DbError::from);

            match inserted {
                Ok(row) => {
                    info!(game_id = %row.id, "Game created");
                    return GameRecord::try_from(row);
                }
                Err(e) if e.is_conflict() => {
                    warn!(attempt, game_id = %row.id, "Game id collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::with_kind(
            DbErrorKind::Conflict,
            "Could not allocate a unique game id",
        ))
    }

    /// Loads a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] on database failure or an undecodable row.
    #[instrument(skip(self))]
    pub fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::games::table
            .find(game_id)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(GameRecord::try_from(row)?)),
            None => {
                debug!("Game not found");
                Ok(None)
            }
        }
    }

    /// Writes a game's state back, guarded by its version.
    ///
    /// The row is updated only if its stored version still equals the
    /// record's; the returned record carries the incremented version.
    ///
    /// # Errors
    ///
    /// [`DbErrorKind::Conflict`] if another writer saved first,
    /// [`DbErrorKind::NotFound`] if the game does not exist.
    #[instrument(skip(self, record), fields(game_id = %record.id(), version = record.version()))]
    pub fn save_game(&self, record: &GameRecord) -> Result<GameRecord, DbError> {
        use schema::games::dsl;

        let mut conn = self.connection()?;
        let columns = StateColumns::encode(record.state())?;
        let now = chrono::Utc::now().naive_utc();

        let updated = diesel::update(
            dsl::games
                .filter(dsl::id.eq(record.id()))
                .filter(dsl::version.eq(record.version())),
        )
        .set((
            dsl::board.eq(columns.board),
            dsl::current_player.eq(columns.current_player),
            dsl::status.eq(columns.status),
            dsl::winner.eq(columns.winner),
            dsl::version.eq(record.version() + 1),
            dsl::updated_at.eq(now),
        ))
        .returning(GameRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        if let Some(row) = updated {
            info!(version = row.version, status = %row.status, "Game saved");
            return GameRecord::try_from(row);
        }

        let exists = dsl::games
            .find(record.id())
            .select(dsl::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();

        if exists {
            warn!("Stale version, game was modified concurrently");
            Err(DbError::with_kind(
                DbErrorKind::Conflict,
                format!("Game '{}' was modified concurrently", record.id()),
            ))
        } else {
            Err(DbError::with_kind(
                DbErrorKind::NotFound,
                format!("Game '{}' not found", record.id()),
            ))
        }
    }
}

/// Random id drawn from `A-Z a-z 0-9`.
fn generate_game_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GAME_ID_LEN)
        .map(char::from)
        .collect()
}
