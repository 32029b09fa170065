//! Material evaluation
//!
//! Scores a position by summing fixed piece values. The score is always
//! relative to White: positive favors White no matter who is to move, and the
//! search interprets it through its maximizing/minimizing selection.

use shakmaty::{Color, Position, Role, Square};

use super::rules::ChessGame;
use super::search::Score;

/// Side whose material counts positively.
pub const REFERENCE_SIDE: Color = Color::White;

/// Static evaluation of a position.
pub trait Evaluator<P> {
    fn evaluate(&self, position: &P) -> Score;
}

/// Material-only evaluation over the 64 squares.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator<ChessGame> for MaterialEvaluator {
    fn evaluate(&self, position: &ChessGame) -> Score {
        material(position)
    }
}

pub fn role_value(role: Role) -> Score {
    match role {
        Role::Pawn => 100,
        Role::Knight => 320,
        Role::Bishop => 330,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 20000,
    }
}

/// White material minus Black material.
pub fn material(game: &ChessGame) -> Score {
    let board = game.position().board();
    Square::ALL
        .iter()
        .filter_map(|&sq| board.piece_at(sq))
        .map(|piece| {
            let value = role_value(piece.role);
            if piece.color == REFERENCE_SIDE { value } else { -value }
        })
        .sum()
}
