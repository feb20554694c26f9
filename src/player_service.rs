//! Player registration business logic layer.

use tracing::{debug, info, instrument, warn};

use crate::{DbError, DbErrorKind, GameRepository, Player};

/// Resolves external player identifiers (phone numbers) to stable players.
///
/// Wraps [`GameRepository`] with get-or-create semantics so a phone number
/// always maps to the same player id.
#[derive(Debug, Clone)]
pub struct PlayerService {
    repository: GameRepository,
}

impl PlayerService {
    /// Creates a new player service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating PlayerService");
        Self { repository }
    }

    /// Returns the player registered under `phone_number`, creating one if
    /// none exists. An existing player keeps its original name.
    ///
    /// # Errors
    ///
    /// Returns a [`DbErrorKind::Invalid`] error if the number has no
    /// characters left after normalizing, or [`DbError`] if a database
    /// error occurs.
    #[instrument(skip(self))]
    pub fn register(&self, name: String, phone_number: String) -> Result<Player, DbError> {
        let phone_number = normalize_phone(&phone_number);
        if phone_number.is_empty() {
            warn!("Rejected blank phone number");
            return Err(DbError::with_kind(
                DbErrorKind::Invalid,
                "phoneNumber must not be blank",
            ));
        }
        if let Some(player) = self.repository.find_player_by_phone(&phone_number)? {
            info!(player_id = player.id(), "Existing player found");
            return Ok(player);
        }

        debug!("Registering new player");
        match self.repository.create_player(name.trim().to_string(), phone_number.clone()) {
            Ok(player) => Ok(player),
            // Lost a race with a concurrent registration of the same number.
            Err(e) if e.is_conflict() => self
                .repository
                .find_player_by_phone(&phone_number)?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Looks up the player registered under `phone_number`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn resolve(&self, phone_number: &str) -> Result<Option<Player>, DbError> {
        self.repository
            .find_player_by_phone(&normalize_phone(phone_number))
    }
}

/// Drops spaces, dashes, dots and parentheses so formatting variants of one
/// number resolve to the same player.
pub fn normalize_phone(phone_number: &str) -> String {
    phone_number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}
