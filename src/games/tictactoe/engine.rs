//! State transitions for tic-tac-toe.
//!
//! Every function takes a [`GameState`] snapshot and returns a new one. The
//! engine holds nothing between calls and performs no I/O; callers that let
//! several requests touch the same stored game must serialize those calls
//! themselves.

use super::action::{EngineError, Move};
use super::opponent::OpponentStrategy;
use super::rules::{check_draw, check_winner};
use super::types::{GameState, GameStatus, Mark, Square, Winner};
use tracing::{debug, info, instrument, warn};

/// Applies a move, returning the resulting state.
///
/// Preconditions are checked in order: the game is playing, the move's mark
/// is on turn, the target square is empty.
///
/// # Errors
///
/// [`EngineError::GameOver`], [`EngineError::WrongTurn`] or
/// [`EngineError::CellOccupied`] for the first violated precondition.
#[instrument(skip(state), fields(player = %mv.player, position = %mv.position))]
pub fn apply_move(state: &GameState, mv: Move) -> Result<GameState, EngineError> {
    if state.is_finished() {
        warn!("Move on finished game");
        return Err(EngineError::GameOver);
    }

    let expected = *state.current_player();
    if mv.player != expected {
        warn!(expected = %expected, "Move out of turn");
        return Err(EngineError::WrongTurn {
            expected,
            got: mv.player,
        });
    }

    if !state.board().is_empty(mv.position) {
        warn!("Square already occupied");
        return Err(EngineError::CellOccupied(mv.position));
    }

    let mut next = state.clone();
    place(&mut next, mv);
    Ok(next)
}

/// Plays the automatic move for the mark on turn.
///
/// The strategy picks among the empty squares; the turn passes back to the
/// other mark unless the move ends the game.
///
/// # Errors
///
/// [`EngineError::GameOver`] if the game is finished or has no empty square.
#[instrument(skip(state, strategy), fields(player = %state.current_player()))]
pub fn system_play(
    state: &GameState,
    strategy: &mut dyn OpponentStrategy,
) -> Result<GameState, EngineError> {
    if state.is_finished() {
        return Err(EngineError::GameOver);
    }

    let position = strategy.choose(state.board()).ok_or_else(|| {
        warn!("No empty square for system move");
        EngineError::GameOver
    })?;

    if !state.board().is_empty(position) {
        return Err(EngineError::CellOccupied(position));
    }

    debug!(position = %position, "System move chosen");
    let mut next = state.clone();
    place(&mut next, Move::new(*state.current_player(), position));
    Ok(next)
}

/// Ends a game early.
///
/// A playing game becomes finished with no winner. A finished game is
/// returned unchanged, keeping its winner.
#[instrument(skip(state), fields(status = %state.status()))]
pub fn end_game(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !next.is_finished() {
        info!("Game ended without a winner");
        next.finish(Winner::Nobody);
    }
    next
}

/// Status and winner implied by the board alone.
#[instrument(skip(state))]
pub fn evaluate(state: &GameState) -> (GameStatus, Winner) {
    if let Some(mark) = check_winner(state.board()) {
        (GameStatus::Finished, Winner::Mark(mark))
    } else if check_draw(state.board()) {
        (GameStatus::Finished, Winner::Nobody)
    } else {
        (GameStatus::Playing, Winner::Nobody)
    }
}

/// Whether a state can arise from play starting with X on an empty board.
///
/// X holds as many squares as O or one more, a playing game has the mark on
/// turn that the counts imply, and a finished game carries the winner its
/// board implies. A game ended early may be finished on an open board, but
/// then without a winner.
#[instrument(skip(state))]
pub fn is_consistent(state: &GameState) -> bool {
    let count = |mark| {
        state
            .board()
            .squares()
            .iter()
            .filter(|sq| **sq == Square::Occupied(mark))
            .count()
    };
    let (xs, os) = (count(Mark::X), count(Mark::O));
    if xs != os && xs != os + 1 {
        debug!(xs, os, "Impossible mark counts");
        return false;
    }

    match (evaluate(state), *state.status()) {
        ((GameStatus::Finished, implied), GameStatus::Finished) => implied == *state.winner(),
        ((GameStatus::Finished, _), GameStatus::Playing) => false,
        ((GameStatus::Playing, _), GameStatus::Finished) => *state.winner() == Winner::Nobody,
        ((GameStatus::Playing, _), GameStatus::Playing) => {
            let on_turn = if xs == os { Mark::X } else { Mark::O };
            *state.winner() == Winner::Nobody && *state.current_player() == on_turn
        }
    }
}

fn place(state: &mut GameState, mv: Move) {
    state
        .board_mut()
        .set(mv.position, Square::Occupied(mv.player));

    match evaluate(state) {
        (GameStatus::Finished, winner) => {
            info!(winner = ?winner.mark(), "Game finished");
            state.finish(winner);
        }
        (GameStatus::Playing, _) => state.set_current_player(mv.player.opponent()),
    }
}
