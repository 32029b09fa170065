//! Rules engine boundary
//!
//! The search never inspects a board directly. Everything it needs from the
//! game (termination, move generation, make/unmake) goes through
//! [`RulesEngine`], so any game with apply/undo semantics can be searched.

mod chess;

use std::fmt::Debug;

use thiserror::Error;

pub use chess::{ChessGame, ChessRules, Fingerprint, GameStatus, move_to_uci, render_board};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("malformed move: {0}")]
    MalformedMove(String),
    #[error("no move to undo")]
    NothingToUndo,
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// The four operations the search consumes.
pub trait RulesEngine {
    type Position;
    type Move: Clone + PartialEq + Debug;

    fn is_game_over(&self, position: &Self::Position) -> bool;

    /// Legal moves in engine-defined order. The search never reorders them.
    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    /// Play `mv` in place. Fails if `mv` is not legal in `position`.
    fn apply_move(&self, position: &mut Self::Position, mv: &Self::Move) -> Result<(), RulesError>;

    /// Revert the most recent `apply_move`. Fails if nothing is pending.
    fn undo_last_move(&self, position: &mut Self::Position) -> Result<(), RulesError>;
}
