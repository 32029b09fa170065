//! Depth-limited minimax with alpha-beta cutoffs.

use crate::engine::eval::Evaluator;
use crate::engine::rules::RulesEngine;

use super::searcher::Searcher;
use super::types::{INFINITY, Score, SearchError};

impl<R, E> Searcher<R, E>
where
    R: RulesEngine,
    E: Evaluator<R::Position>,
{
    pub(super) fn leaf(&mut self, position: &R::Position) -> Score {
        self.stats.leaves += 1;
        self.evaluator.evaluate(position)
    }

    /// Value of `position` with `depth` plies to go. White maximizes.
    ///
    /// `alpha` and `beta` are taken by value: updates stay local to this node.
    /// Every applied move is undone before its child's result is inspected,
    /// so the position is restored on cutoffs and on errors alike.
    pub fn minimax(
        &mut self,
        position: &mut R::Position,
        depth: u32,
        maximizing: bool,
        mut alpha: Score,
        mut beta: Score,
    ) -> Result<Score, SearchError> {
        self.stats.nodes += 1;

        if depth == 0 || self.rules.is_game_over(position) {
            return Ok(self.leaf(position));
        }

        let moves = self.rules.legal_moves(position);
        if moves.is_empty() {
            return Ok(self.leaf(position));
        }

        let mut value = if maximizing { -INFINITY } else { INFINITY };

        for mv in &moves {
            self.rules.apply_move(position, mv)?;
            let child = self.minimax(position, depth - 1, !maximizing, alpha, beta);
            self.rules.undo_last_move(position)?;
            let child = child?;

            if maximizing {
                value = value.max(child);
                alpha = alpha.max(value);
            } else {
                value = value.min(child);
                beta = beta.min(value);
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok(value)
    }
}
