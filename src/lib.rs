pub mod engine;
pub mod play;
pub mod uci;

pub use engine::eval::{Evaluator, MaterialEvaluator};
pub use engine::rules::{ChessGame, ChessRules, RulesEngine, RulesError};
pub use engine::search::{ChessSearcher, SearchError, SearchResult, Searcher, find_best_move};
pub use play::PlaySession;
pub use shakmaty;
pub use uci::UCI;
