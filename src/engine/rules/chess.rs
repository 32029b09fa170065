//! Standard chess through `shakmaty`, with an undo stack and the draw rules
//! shakmaty leaves to the caller (75-move rule, fivefold repetition).

use std::fmt::Write as _;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Rank, Square};

use super::{RulesEngine, RulesError};

/// Halfmove clock value at which the game is drawn without a claim.
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
const FIVEFOLD: usize = 5;

fn position_hash(pos: &Chess) -> u64 {
    let z: Zobrist64 = pos.zobrist_hash(EnPassantMode::Legal);
    z.0
}

pub fn move_to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Cheap structural identity of a game state, used to check that a search
/// left the position exactly as it found it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hash: u64,
    pub halfmoves: u32,
    pub fullmoves: u32,
    pub ply: usize,
}

/// A chess game: the current position plus everything needed to take moves back.
#[derive(Clone, Debug)]
pub struct ChessGame {
    current: Chess,
    /// Position before each applied move, with the move itself.
    history: Vec<(Chess, Move)>,
    /// Hash of every position reached, the current one last.
    hashes: Vec<u64>,
}

impl ChessGame {
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    pub fn from_position(pos: Chess) -> Self {
        let hash = position_hash(&pos);
        ChessGame {
            current: pos,
            history: Vec::new(),
            hashes: vec![hash],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        Ok(Self::from_position(pos))
    }

    pub fn position(&self) -> &Chess {
        &self.current
    }

    pub fn turn(&self) -> Color {
        self.current.turn()
    }

    /// Number of moves that can be taken back.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.current.legal_moves().into_iter().collect()
    }

    /// Parse a move in UCI notation and check it is legal here.
    pub fn parse_uci(&self, text: &str) -> Result<Move, RulesError> {
        let uci: UciMove = text
            .trim()
            .parse()
            .map_err(|_| RulesError::MalformedMove(text.to_string()))?;
        uci.to_move(&self.current)
            .map_err(|_| RulesError::IllegalMove(text.to_string()))
    }

    pub fn push(&mut self, mv: &Move) -> Result<(), RulesError> {
        let next = self
            .current
            .clone()
            .play(mv)
            .map_err(|_| RulesError::IllegalMove(move_to_uci(mv)))?;
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push((prev, mv.clone()));
        self.hashes.push(position_hash(&self.current));
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Move, RulesError> {
        let (prev, mv) = self.history.pop().ok_or(RulesError::NothingToUndo)?;
        self.current = prev;
        self.hashes.pop();
        Ok(mv)
    }

    fn repetitions(&self) -> usize {
        let current = position_hash(&self.current);
        self.hashes.iter().filter(|&&h| h == current).count()
    }

    /// Generates legal moves once; with none left the game is decided by
    /// whether the side to move is in check.
    pub fn status(&self) -> GameStatus {
        let pos = &self.current;
        if pos.legal_moves().is_empty() {
            if pos.is_check() {
                GameStatus::Checkmate { winner: !pos.turn() }
            } else {
                GameStatus::Stalemate
            }
        } else if pos.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if pos.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES {
            GameStatus::SeventyFiveMoves
        } else if self.repetitions() >= FIVEFOLD {
            GameStatus::FivefoldRepetition
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            hash: position_hash(&self.current),
            halfmoves: self.current.halfmoves(),
            fullmoves: self.current.fullmoves().get(),
            ply: self.history.len(),
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

/// ASCII diagram, rank 8 at the top, uppercase for White.
pub fn render_board(game: &ChessGame) -> String {
    let board = game.position().board();
    let mut out = String::new();
    for &rank in Rank::ALL.iter().rev() {
        let row: Vec<String> = File::ALL
            .iter()
            .map(|&file| match board.piece_at(Square::from_coords(file, rank)) {
                Some(piece) => piece.char().to_string(),
                None => ".".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}

/// The chess rules as seen by the search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChessRules;

impl RulesEngine for ChessRules {
    type Position = ChessGame;
    type Move = Move;

    fn is_game_over(&self, position: &ChessGame) -> bool {
        position.is_game_over()
    }

    fn legal_moves(&self, position: &ChessGame) -> Vec<Move> {
        position.legal_moves()
    }

    fn apply_move(&self, position: &mut ChessGame, mv: &Move) -> Result<(), RulesError> {
        position.push(mv)
    }

    fn undo_last_move(&self, position: &mut ChessGame) -> Result<(), RulesError> {
        position.pop().map(|_| ())
    }
}
