//! minimax_chess: play against a fixed-depth minimax engine, or serve UCI.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use minimax_chess::engine::search::{DEFAULT_DEPTH, MAX_DEPTH};
use minimax_chess::shakmaty::Color;
use minimax_chess::{ChessGame, PlaySession, UCI};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    White,
    Black,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "minimax_chess")]
#[command(about = "Play chess against a minimax engine with alpha-beta pruning")]
struct Args {
    /// Your color in the terminal game
    #[arg(short, long, value_enum, default_value = "white")]
    color: Side,

    /// Engine search depth in plies
    #[arg(short, long, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u32).range(1..=MAX_DEPTH as i64))]
    depth: u32,

    /// Start from this position instead of the initial one
    #[arg(short, long)]
    fen: Option<String>,

    /// Speak UCI on stdin/stdout instead of running the terminal game
    #[arg(long)]
    uci: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.uci {
        println!("minimax_chess {} - UCI mode", env!("CARGO_PKG_VERSION"));
        let mut uci = UCI::with_depth(args.depth);
        return match uci.run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("fatal: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let game = match args.fen.as_deref().map(ChessGame::from_fen) {
        None => ChessGame::new(),
        Some(Ok(game)) => game,
        Some(Err(e)) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let human = match args.color {
        Side::White => Color::White,
        Side::Black => Color::Black,
        Side::Random => {
            if rand::random::<bool>() { Color::White } else { Color::Black }
        }
    };

    match PlaySession::new(game, human, args.depth).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}
