use std::io::{self, BufRead, Write};
use std::time::Instant;

use shakmaty::Color;
use tracing::warn;
use vampirc_uci::uci::UciSearchControl;
use vampirc_uci::{UciMessage, parser};

use crate::engine::eval::Evaluator;
use crate::engine::rules::{ChessGame, move_to_uci, render_board};
use crate::engine::search::{ChessSearcher, DEFAULT_DEPTH, MAX_DEPTH, SearchError};

pub struct UCI {
    pub board: ChessGame,
    searcher: ChessSearcher,
    /// Search depth used when `go` does not give one (UCI option Depth).
    depth: u32,
}

impl UCI {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }

    pub fn with_depth(depth: u32) -> Self {
        UCI {
            board: ChessGame::new(),
            searcher: ChessSearcher::chess(),
            depth: depth.clamp(1, MAX_DEPTH),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn run(&mut self) -> Result<(), UciError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.run_with(stdin.lock(), &mut stdout)
    }

    /// Process commands until `quit` or end of input. Read and write
    /// failures end the loop with an error, as do search failures.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), UciError> {
        for line in input.lines() {
            if !self.handle_line(&line?, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Handle one command line. Returns `Ok(false)` on `quit`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool, UciError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }

        match parser::parse_one(line) {
            UciMessage::Uci => self.cmd_uci(out)?,
            UciMessage::IsReady => writeln!(out, "readyok")?,
            UciMessage::SetOption { name, value } => {
                self.apply_setoption(name.trim(), value.as_deref());
            }
            UciMessage::UciNewGame => self.board = ChessGame::new(),
            UciMessage::Position { startpos, fen, moves } => {
                let fen_str = fen.as_ref().map(|f| f.as_str());
                let move_strs: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                let refs: Vec<&str> = move_strs.iter().map(String::as_str).collect();
                self.apply_position(startpos, fen_str, &refs);
            }
            UciMessage::Go { search_control, .. } => {
                let depth = go_depth(search_control.as_ref()).unwrap_or(self.depth);
                self.do_go(depth, out)?;
            }
            // Searches run to completion before the next line is read.
            UciMessage::Stop => {}
            UciMessage::Quit => return Ok(false),
            UciMessage::Unknown(ref s, _) => {
                let parts: Vec<&str> = s.split_whitespace().collect();
                match parts.first().copied() {
                    Some("d") | Some("display") => self.cmd_display(out)?,
                    Some("eval") => self.cmd_eval(out)?,
                    Some("moves") => self.cmd_moves(out)?,
                    _ => warn!(command = %line, "unknown command"),
                }
            }
            _ => {}
        }
        out.flush()?;
        Ok(true)
    }

    fn cmd_uci<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name minimax_chess {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author minimax_chess")?;
        writeln!(out)?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {}",
            DEFAULT_DEPTH, MAX_DEPTH
        )?;
        writeln!(out, "uciok")
    }

    fn apply_setoption(&mut self, name: &str, value: Option<&str>) {
        let opt = name.to_lowercase().replace([' ', '_'], "");
        let value = value.unwrap_or("").trim();
        if opt == "depth" {
            match value.parse::<u32>() {
                Ok(depth) => self.depth = depth.clamp(1, MAX_DEPTH),
                Err(_) => warn!(value, "ignoring invalid Depth"),
            }
        }
    }

    fn apply_position(&mut self, startpos: bool, fen: Option<&str>, move_strs: &[&str]) {
        if startpos {
            self.board = ChessGame::new();
        } else if let Some(fen_str) = fen {
            match ChessGame::from_fen(fen_str) {
                Ok(game) => self.board = game,
                Err(e) => {
                    warn!(error = %e, "ignoring position");
                    return;
                }
            }
        }

        for &s in move_strs {
            let played = self
                .board
                .parse_uci(s)
                .and_then(|mv| self.board.push(&mv));
            if let Err(e) = played {
                warn!(error = %e, "stopping at bad move in position command");
                break;
            }
        }
    }

    fn do_go<W: Write>(&mut self, depth: u32, out: &mut W) -> Result<(), UciError> {
        let start = Instant::now();
        let maximizing = self.board.turn() == Color::White;
        let result = self.searcher.search(&mut self.board, depth, maximizing)?;

        match (result.best_move, result.score) {
            (Some(mv), Some(score)) => {
                writeln!(
                    out,
                    "info depth {} score cp {} nodes {} time {} pv {}",
                    depth,
                    side_relative(score, self.board.turn()),
                    result.stats.nodes,
                    start.elapsed().as_millis(),
                    move_to_uci(&mv)
                )?;
                writeln!(out, "bestmove {}", move_to_uci(&mv))?;
            }
            _ => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }

    fn cmd_display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        write!(out, "{}", render_board(&self.board))?;
        let side = if self.board.turn() == Color::White { "White" } else { "Black" };
        writeln!(out, "{} to move, status {:?}", side, self.board.status())
    }

    fn cmd_eval<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let score = self.searcher.evaluator().evaluate(&self.board);
        writeln!(out, "Evaluation: {} cp", score)?;
        writeln!(out, "(Positive = White advantage)")
    }

    fn cmd_moves<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let moves: Vec<String> = self.board.legal_moves().iter().map(move_to_uci).collect();
        writeln!(out, "Legal moves: {}", moves.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UciError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
}

fn go_depth(search_control: Option<&UciSearchControl>) -> Option<u32> {
    search_control
        .and_then(|sc| sc.depth)
        .map(|d| u32::from(d).clamp(1, MAX_DEPTH))
}

/// UCI reports scores from the side to move; ours are White-relative.
fn side_relative(score: i32, turn: Color) -> i32 {
    match turn {
        Color::White => score,
        Color::Black => -score,
    }
}

impl Default for UCI {
    fn default() -> Self {
        Self::new()
    }
}
