//! Search: plain minimax with alpha-beta pruning, no ordering or caching.

mod minimax;
mod searcher;
mod types;

pub use searcher::{ChessSearcher, Searcher, find_best_move};
pub use types::{DEFAULT_DEPTH, INFINITY, MAX_DEPTH, Score, SearchError, SearchResult, SearchStats};
