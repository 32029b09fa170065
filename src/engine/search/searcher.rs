//! Searcher: owns the rules engine and evaluator, and picks the root move.

use tracing::{debug, trace};

use crate::engine::eval::{Evaluator, MaterialEvaluator};
use crate::engine::rules::{ChessRules, RulesEngine};

use super::types::{INFINITY, Score, SearchError, SearchResult, SearchStats};

pub struct Searcher<R, E> {
    pub(super) rules: R,
    pub(super) evaluator: E,
    pub(super) stats: SearchStats,
}

/// The searcher used by the shells: shakmaty rules, material evaluation.
pub type ChessSearcher = Searcher<ChessRules, MaterialEvaluator>;

impl ChessSearcher {
    pub fn chess() -> Self {
        Searcher::new(ChessRules, MaterialEvaluator)
    }
}

impl Default for ChessSearcher {
    fn default() -> Self {
        Self::chess()
    }
}

impl<R, E> Searcher<R, E>
where
    R: RulesEngine,
    E: Evaluator<R::Position>,
{
    pub fn new(rules: R, evaluator: E) -> Self {
        Searcher {
            rules,
            evaluator,
            stats: SearchStats::default(),
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Stats of the most recent `search`.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pick the move for the side given by `maximizing` (true = White).
    ///
    /// A root `depth` of 0 is searched as 1, so unlike `minimax` the root
    /// enumerates moves even at depth 0: a caller asking for a move always
    /// gets one unless the side to move has none. Equal scores keep the move
    /// that came first in the rules engine's order.
    pub fn search(
        &mut self,
        position: &mut R::Position,
        depth: u32,
        maximizing: bool,
    ) -> Result<SearchResult<R::Move>, SearchError> {
        self.stats = SearchStats::default();
        let depth = depth.max(1);

        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut best: Option<(R::Move, Score)> = None;

        for mv in self.rules.legal_moves(position) {
            self.rules.apply_move(position, &mv)?;
            let value = self.minimax(position, depth - 1, !maximizing, alpha, beta);
            self.rules.undo_last_move(position)?;
            let value = value?;
            trace!(?mv, value, "root move");

            let improves = match &best {
                None => true,
                Some((_, best_value)) if maximizing => value > *best_value,
                Some((_, best_value)) => value < *best_value,
            };
            if improves {
                if maximizing {
                    alpha = alpha.max(value);
                } else {
                    beta = beta.min(value);
                }
                best = Some((mv, value));
            }
        }

        debug!(
            depth,
            maximizing,
            nodes = self.stats.nodes,
            leaves = self.stats.leaves,
            cutoffs = self.stats.cutoffs,
            score = ?best.as_ref().map(|(_, s)| *s),
            "search complete"
        );

        let (best_move, score) = match best {
            Some((mv, score)) => (Some(mv), Some(score)),
            None => (None, None),
        };
        Ok(SearchResult {
            best_move,
            score,
            stats: self.stats.clone(),
        })
    }
}

/// Best move for the side given by `maximizing`, or `None` if there is no
/// legal move. Callers should treat `None` as game over.
pub fn find_best_move<R, E>(
    rules: R,
    evaluator: E,
    position: &mut R::Position,
    depth: u32,
    maximizing: bool,
) -> Result<Option<R::Move>, SearchError>
where
    R: RulesEngine,
    E: Evaluator<R::Position>,
{
    let mut searcher = Searcher::new(rules, evaluator);
    Ok(searcher.search(position, depth, maximizing)?.best_move)
}
