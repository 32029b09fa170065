//! Terminal game against the engine.
//!
//! The human enters moves in UCI notation; the engine replies with a
//! fixed-depth search. Input and output are generic so sessions can be
//! scripted.

use std::io::{self, BufRead, Write};

use shakmaty::Color;
use thiserror::Error;
use tracing::info;

use crate::engine::rules::{ChessGame, GameStatus, move_to_uci, render_board};
use crate::engine::search::{ChessSearcher, SearchError};

#[derive(Debug, Error)]
pub enum PlayError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub struct PlaySession {
    game: ChessGame,
    human: Color,
    depth: u32,
    searcher: ChessSearcher,
}

/// What one line of human input did.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Moved,
    Stay,
    Quit,
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

impl PlaySession {
    pub fn new(game: ChessGame, human: Color, depth: u32) -> Self {
        PlaySession {
            game,
            human,
            depth: depth.max(1),
            searcher: ChessSearcher::chess(),
        }
    }

    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    pub fn run(&mut self) -> Result<(), PlayError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.run_with(stdin.lock(), &mut stdout)
    }

    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), PlayError> {
        let mut lines = input.lines();

        writeln!(out, "\nYou are playing as {}", color_name(self.human))?;
        print_help(out)?;
        self.print_board(out)?;

        while !self.game.is_game_over() {
            if self.game.turn() == self.human {
                writeln!(out, "\nYour turn!")?;
                loop {
                    write!(out, "\nEnter your move (or 'help' for commands): ")?;
                    out.flush()?;
                    let Some(line) = lines.next().transpose()? else {
                        writeln!(out, "\nGame ended by user.")?;
                        return Ok(());
                    };
                    match self.handle_input(line.trim(), out)? {
                        Input::Moved => break,
                        Input::Stay => continue,
                        Input::Quit => {
                            writeln!(out, "Game ended by user.")?;
                            return Ok(());
                        }
                    }
                }
            } else {
                writeln!(out, "\nAI's turn...")?;
                let maximizing = self.game.turn() == Color::White;
                let result = self.searcher.search(&mut self.game, self.depth, maximizing)?;
                let Some(mv) = result.best_move else {
                    writeln!(out, "AI couldn't find a move!")?;
                    break;
                };
                info!(mv = %move_to_uci(&mv), score = ?result.score, nodes = result.stats.nodes, "engine move");
                self.game.push(&mv).map_err(SearchError::from)?;
                writeln!(out, "AI moved: {}", move_to_uci(&mv))?;
                self.print_board(out)?;
            }
        }

        let status = self.game.status();
        if status.is_over() {
            writeln!(out, "\nGame Over!")?;
            writeln!(out, "{}", describe(status))?;
        }
        Ok(())
    }

    fn handle_input<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<Input> {
        match text.to_lowercase().as_str() {
            "help" => {
                print_help(out)?;
                Ok(Input::Stay)
            }
            "quit" => Ok(Input::Quit),
            "moves" => {
                let moves: Vec<String> = self.game.legal_moves().iter().map(move_to_uci).collect();
                writeln!(out, "Legal moves: {}", moves.join(", "))?;
                Ok(Input::Stay)
            }
            "board" => {
                self.print_board(out)?;
                Ok(Input::Stay)
            }
            "retract" => {
                if self.game.ply() < 2 {
                    writeln!(out, "No moves to retract!")?;
                } else if self.game.pop().and_then(|_| self.game.pop()).is_ok() {
                    self.print_board(out)?;
                }
                Ok(Input::Stay)
            }
            mv_text => match self.game.parse_uci(mv_text) {
                Ok(mv) if self.game.push(&mv).is_ok() => {
                    self.print_board(out)?;
                    Ok(Input::Moved)
                }
                _ => {
                    writeln!(out, "Invalid move! Please enter a legal move.")?;
                    Ok(Input::Stay)
                }
            },
        }
    }

    fn print_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nCurrent board:")?;
        write!(out, "{}", render_board(&self.game))
    }
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nCommands:")?;
    writeln!(out, "  help        - Show this help message")?;
    writeln!(out, "  retract     - Take back the last two moves (yours and AI's)")?;
    writeln!(out, "  moves       - Show all legal moves")?;
    writeln!(out, "  board       - Show the board")?;
    writeln!(out, "  quit        - End the game")?;
    writeln!(out, "\nEnter moves in UCI notation (e.g., e2e4)")
}

pub fn describe(status: GameStatus) -> String {
    match status {
        GameStatus::Ongoing => "Game in progress".to_string(),
        GameStatus::Checkmate { winner } => format!("{} wins by checkmate!", color_name(winner)),
        GameStatus::Stalemate => "Game ended in stalemate!".to_string(),
        GameStatus::InsufficientMaterial => "Game ended due to insufficient material!".to_string(),
        GameStatus::SeventyFiveMoves => "Game ended by 75-move rule!".to_string(),
        GameStatus::FivefoldRepetition => "Game ended by fivefold repetition!".to_string(),
    }
}
