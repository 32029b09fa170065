//! Scores, results, stats, and constants.

use thiserror::Error;

use crate::engine::rules::RulesError;

/// Centipawn-like score, positive favors White.
pub type Score = i32;

/// Win/loss sentinel, well outside any reachable material sum.
pub const INFINITY: Score = 1_000_000;
pub const DEFAULT_DEPTH: u32 = 4;
pub const MAX_DEPTH: u32 = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls to minimax, root children included.
    pub nodes: u64,
    /// Static evaluations performed.
    pub leaves: u64,
    /// Times a node stopped enumerating because alpha >= beta.
    pub cutoffs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<M> {
    /// `None` when the root has no legal move.
    pub best_move: Option<M>,
    /// Value of `best_move`; present exactly when a move is.
    pub score: Option<Score>,
    pub stats: SearchStats,
}

/// The rules engine broke the apply/undo contract during a search.
/// Never recovered from inside the search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search invariant violated: {source}")]
    InvariantViolation {
        #[from]
        source: RulesError,
    },
}
