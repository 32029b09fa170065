//! Search Tests
//!
//! Minimax and alpha-beta behavior over a small synthetic game tree, where
//! every score and every visit can be controlled and observed.

use std::cell::RefCell;

use minimax_chess::engine::eval::Evaluator;
use minimax_chess::engine::rules::{RulesEngine, RulesError};
use minimax_chess::engine::search::{INFINITY, Score, SearchError, Searcher, find_best_move};

// ============================================================================
// Synthetic game
// ============================================================================

enum Node {
    Leaf(Score),
    Branch(Score, Vec<Node>),
}

fn leaf(score: Score) -> Node {
    Node::Leaf(score)
}

fn branch(children: Vec<Node>) -> Node {
    Node::Branch(0, children)
}

/// Arena of nodes; a move is the id of the child node it leads to.
struct TreeRules {
    children: Vec<Vec<usize>>,
    /// Whether nodes without children are reported as game over.
    report_game_over: bool,
    /// Applying this move fails, as a broken rules engine would.
    reject: Option<usize>,
}

struct TreeEval {
    scores: Vec<Score>,
    evaluated: RefCell<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
struct TreePos {
    path: Vec<usize>,
}

impl TreePos {
    fn root() -> Self {
        TreePos { path: vec![0] }
    }

    fn current(&self) -> usize {
        *self.path.last().unwrap()
    }
}

fn build(root: Node) -> (TreeRules, TreeEval) {
    fn walk(node: Node, children: &mut Vec<Vec<usize>>, scores: &mut Vec<Score>) -> usize {
        let id = children.len();
        children.push(Vec::new());
        match node {
            Node::Leaf(score) => scores.push(score),
            Node::Branch(score, kids) => {
                scores.push(score);
                for kid in kids {
                    let kid_id = walk(kid, children, scores);
                    children[id].push(kid_id);
                }
            }
        }
        id
    }

    let mut children = Vec::new();
    let mut scores = Vec::new();
    walk(root, &mut children, &mut scores);
    (
        TreeRules { children, report_game_over: true, reject: None },
        TreeEval { scores, evaluated: RefCell::new(Vec::new()) },
    )
}

impl RulesEngine for TreeRules {
    type Position = TreePos;
    type Move = usize;

    fn is_game_over(&self, position: &TreePos) -> bool {
        self.report_game_over && self.children[position.current()].is_empty()
    }

    fn legal_moves(&self, position: &TreePos) -> Vec<usize> {
        self.children[position.current()].clone()
    }

    fn apply_move(&self, position: &mut TreePos, mv: &usize) -> Result<(), RulesError> {
        if self.reject == Some(*mv) || !self.children[position.current()].contains(mv) {
            return Err(RulesError::IllegalMove(mv.to_string()));
        }
        position.path.push(*mv);
        Ok(())
    }

    fn undo_last_move(&self, position: &mut TreePos) -> Result<(), RulesError> {
        if position.path.len() <= 1 {
            return Err(RulesError::NothingToUndo);
        }
        position.path.pop();
        Ok(())
    }
}

impl Evaluator<TreePos> for TreeEval {
    fn evaluate(&self, position: &TreePos) -> Score {
        self.evaluated.borrow_mut().push(position.current());
        self.scores[position.current()]
    }
}

/// Plain minimax without cutoffs, counting nodes the way the searcher does.
fn exhaustive(rules: &TreeRules, eval: &TreeEval, pos: &mut TreePos, depth: u32, maximizing: bool, nodes: &mut u64) -> Score {
    *nodes += 1;
    let moves = rules.legal_moves(pos);
    if depth == 0 || moves.is_empty() {
        return eval.evaluate(pos);
    }
    let values = moves.iter().map(|mv| {
        rules.apply_move(pos, mv).unwrap();
        let v = exhaustive(rules, eval, pos, depth - 1, !maximizing, nodes);
        rules.undo_last_move(pos).unwrap();
        v
    });
    let values: Vec<Score> = values.collect();
    if maximizing { *values.iter().max().unwrap() } else { *values.iter().min().unwrap() }
}

/// The textbook three-by-three tree: root value 3 through the first child.
fn textbook() -> Node {
    branch(vec![
        branch(vec![leaf(3), leaf(12), leaf(8)]),
        branch(vec![leaf(2), leaf(4), leaf(6)]),
        branch(vec![leaf(14), leaf(5), leaf(2)]),
    ])
}

/// Depth-3 tree with uneven scores.
fn deep() -> Node {
    let mut seed: Score = 17;
    let mut next = move || {
        seed = (seed * 73 + 41) % 199;
        seed - 100
    };
    branch(
        (0..4)
            .map(|_| branch((0..3).map(|_| branch((0..4).map(|_| leaf(next())).collect())).collect()))
            .collect(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_textbook_tree_value_and_move() {
    let (rules, eval) = build(textbook());
    let first_child = rules.children[0][0];
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    let result = searcher.search(&mut pos, 2, true).unwrap();
    assert_eq!(result.best_move, Some(first_child));
    assert_eq!(result.score, Some(3));
}

#[test]
fn test_textbook_tree_prunes_second_branch() {
    let (rules, eval) = build(textbook());
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();
    searcher.search(&mut pos, 2, true).unwrap();

    // Second branch stops after its first leaf (2 <= 3): leaves 4 and 6 are never scored.
    // The third branch cuts off on its last leaf, which skips nothing.
    let scored: Vec<Score> = searcher
        .evaluator()
        .evaluated
        .borrow()
        .iter()
        .map(|&id| searcher.evaluator().scores[id])
        .collect();
    assert_eq!(scored, vec![3, 12, 8, 2, 14, 5, 2]);
    assert_eq!(searcher.stats().cutoffs, 2);
    assert_eq!(searcher.stats().leaves, 7);
    assert_eq!(searcher.stats().nodes, 10);
}

#[test]
fn test_depth_zero_is_evaluation() {
    let (rules, mut eval) = build(textbook());
    eval.scores[0] = 42;
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    for maximizing in [true, false] {
        let score = searcher.minimax(&mut pos, 0, maximizing, -INFINITY, INFINITY).unwrap();
        assert_eq!(score, 42);
    }
    assert_eq!(*searcher.evaluator().evaluated.borrow(), vec![0, 0]);
}

#[test]
fn test_position_restored_after_search() {
    let (rules, eval) = build(deep());
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();
    for depth in 1..=4 {
        for maximizing in [true, false] {
            searcher.search(&mut pos, depth, maximizing).unwrap();
            assert_eq!(pos, TreePos::root());
        }
    }
}

#[test]
fn test_pruning_matches_exhaustive_minimax() {
    for maximizing in [true, false] {
        let (rules, eval) = build(deep());
        let mut nodes = 0;
        let mut pos = TreePos::root();
        let moves = rules.legal_moves(&pos);
        let mut expected = if maximizing { -INFINITY } else { INFINITY };
        for mv in &moves {
            rules.apply_move(&mut pos, mv).unwrap();
            let v = exhaustive(&rules, &eval, &mut pos, 2, !maximizing, &mut nodes);
            rules.undo_last_move(&mut pos).unwrap();
            expected = if maximizing { expected.max(v) } else { expected.min(v) };
        }

        let mut searcher = Searcher::new(rules, eval);
        let result = searcher.search(&mut pos, 3, maximizing).unwrap();
        assert_eq!(result.score, Some(expected));
        assert!(result.stats.nodes < nodes, "{} >= {}", result.stats.nodes, nodes);
        assert!(result.stats.cutoffs > 0);
    }
}

#[test]
fn test_ties_keep_first_move() {
    let (rules, eval) = build(branch(vec![leaf(1), leaf(5), leaf(5), leaf(-7), leaf(-7)]));
    let ids = rules.children[0].clone();
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    let max = searcher.search(&mut pos, 1, true).unwrap();
    assert_eq!(max.best_move, Some(ids[1]));
    assert_eq!(max.score, Some(5));

    let min = searcher.search(&mut pos, 1, false).unwrap();
    assert_eq!(min.best_move, Some(ids[3]));
    assert_eq!(min.score, Some(-7));
}

#[test]
fn test_all_equal_scores_pick_first() {
    for maximizing in [true, false] {
        let (rules, eval) = build(branch(vec![leaf(0), leaf(0), leaf(0)]));
        let first = rules.children[0][0];
        let mut pos = TreePos::root();
        assert_eq!(find_best_move(rules, eval, &mut pos, 1, maximizing).unwrap(), Some(first));
    }
}

#[test]
fn test_no_legal_move_returns_none() {
    for depth in 0..5 {
        let (rules, eval) = build(leaf(9));
        let mut pos = TreePos::root();
        let result = Searcher::new(rules, eval).search(&mut pos, depth, true).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, None);
    }
}

#[test]
fn test_game_over_node_is_not_expanded() {
    let (rules, mut eval) = build(leaf(0));
    eval.scores[0] = -15;
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();
    let score = searcher.minimax(&mut pos, 3, true, -INFINITY, INFINITY).unwrap();
    assert_eq!(score, -15);
    assert_eq!(searcher.stats().nodes, 1);
}

#[test]
fn test_empty_moves_without_game_over_evaluates() {
    let (mut rules, eval) = build(branch(vec![leaf(4), branch(vec![])]));
    rules.report_game_over = false;
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    // The empty branch scores 0 and the minimizer takes it over the leaf's 4.
    let result = searcher.search(&mut pos, 3, false).unwrap();
    assert_eq!(result.score, Some(0));
}

#[test]
fn test_minimizer_root() {
    let (rules, eval) = build(textbook());
    let second = rules.children[0][1];
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    // Max nodes below: 12, 6, 14. The minimizer picks the second branch.
    let result = searcher.search(&mut pos, 2, false).unwrap();
    assert_eq!(result.score, Some(6));
    assert_eq!(result.best_move, Some(second));
}

#[test]
fn test_rejected_move_is_fatal_and_position_restored() {
    let (mut rules, eval) = build(deep());
    let grandchild = rules.children[rules.children[0][1]][0];
    rules.reject = Some(grandchild);
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    let err = searcher.search(&mut pos, 3, true).unwrap_err();
    assert!(matches!(
        err,
        SearchError::InvariantViolation { source: RulesError::IllegalMove(_) }
    ));
    assert_eq!(pos, TreePos::root());
}

#[test]
fn test_undo_without_apply_fails() {
    let (rules, _) = build(textbook());
    let mut pos = TreePos::root();
    assert_eq!(rules.undo_last_move(&mut pos), Err(RulesError::NothingToUndo));
}

#[test]
fn test_root_depth_zero_searches_one_ply() {
    let (rules, eval) = build(textbook());
    let mut searcher = Searcher::new(rules, eval);
    let mut pos = TreePos::root();

    let shallow = searcher.search(&mut pos, 0, true).unwrap();
    let one_ply = searcher.search(&mut pos, 1, true).unwrap();
    assert!(shallow.best_move.is_some());
    assert_eq!(shallow, one_ply);
    assert_eq!(shallow.stats.leaves, 3);
}
