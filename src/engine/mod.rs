//! Chess engine components
//!
//! - Rules engine boundary and the shakmaty-backed chess rules
//! - Material evaluation
//! - Minimax search with alpha-beta pruning

pub mod eval;
pub mod rules;
pub mod search;

pub use eval::{Evaluator, MaterialEvaluator};
pub use rules::{ChessGame, ChessRules, GameStatus, RulesEngine, RulesError};
pub use search::{ChessSearcher, INFINITY, Score, SearchError, SearchResult, Searcher, find_best_move};
