//! othello-rs: an Othello engine with a reusable minimax tree.
//!
//! ## Usage
//!
//! - `othello-rs` - Show a demo (computer against computer)
//! - `othello-rs play` - Start the text protocol on stdin/stdout
//! - `othello-rs selfplay` - Computer White against a random Black

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};

use othello_rs::board::{Color, str_coord};
use othello_rs::constants::{DEFAULT_LOOKAHEAD, MAX_LOOKAHEAD};
use othello_rs::game::Game;
use othello_rs::player::Player;
use othello_rs::protocol::ProtocolEngine;

/// othello-rs: an Othello engine with a reusable minimax tree
#[derive(Parser)]
#[command(name = "othello-rs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak the line protocol on stdin/stdout
    Play {
        /// Computer lookahead in plies
        #[arg(short, long, default_value_t = DEFAULT_LOOKAHEAD, value_parser = parse_depth)]
        depth: usize,
        /// Which side the computer plays
        #[arg(long, value_enum, default_value_t = Side::White)]
        ai_color: Side,
    },
    /// Computer White against a seeded random Black
    Selfplay {
        #[arg(short, long, default_value_t = DEFAULT_LOOKAHEAD, value_parser = parse_depth)]
        depth: usize,
        /// Number of games
        #[arg(short, long, default_value_t = 10)]
        games: u32,
        /// Seed for the random player
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
    },
    /// Play one computer-vs-computer game and print it
    Demo {
        #[arg(short, long, default_value_t = DEFAULT_LOOKAHEAD, value_parser = parse_depth)]
        depth: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
    /// Two humans, no computer
    None,
}

fn parse_depth(s: &str) -> Result<usize, String> {
    let d: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (1..=MAX_LOOKAHEAD).contains(&d) {
        Ok(d)
    } else {
        Err(format!("depth must be between 1 and {MAX_LOOKAHEAD}"))
    }
}

/// Minimal stderr backend for the `log` facade.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Play { depth, ai_color }) => run_protocol(depth, ai_color),
        Some(Commands::Selfplay { depth, games, seed }) => run_selfplay(depth, games, seed),
        Some(Commands::Demo { depth }) => run_demo(depth),
        None => run_demo(DEFAULT_LOOKAHEAD),
    }
}

fn run_protocol(depth: usize, side: Side) -> Result<()> {
    let player = |color: Color| {
        let computer = match side {
            Side::White => color == Color::White,
            Side::Black => color == Color::Black,
            Side::None => false,
        };
        if computer {
            Player::computer(color, depth)
        } else {
            Player::human(color)
        }
    };
    let game = Game::new(player(Color::Black), player(Color::White));
    let mut engine = ProtocolEngine::with_game(game, depth);
    engine
        .run(std::io::stdin().lock(), std::io::stdout())
        .context("protocol session failed")
}

fn run_selfplay(depth: usize, games: u32, seed: u64) -> Result<()> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let (mut black_wins, mut white_wins, mut draws) = (0u32, 0u32, 0u32);

    for n in 1..=games {
        let mut game = Game::new(
            Player::human(Color::Black),
            Player::computer(Color::White, depth),
        );
        while !game.status().is_terminal {
            let status = game.status();
            if status.to_move == Color::Black {
                let moves = game.legal_moves(Color::Black);
                let pt = moves[rng.usize(..moves.len())];
                game.play_turn(Some(pt))?;
            } else {
                game.play_turn(None)?;
            }
        }

        let status = game.status();
        match status.winner() {
            Some(Color::Black) => black_wins += 1,
            Some(Color::White) => white_wins += 1,
            None => draws += 1,
        }
        println!(
            "game {n}: black {} white {} after {} moves",
            status.score.0,
            status.score.1,
            status.turn - 1
        );
    }

    println!("\nrandom black: {black_wins}  computer white: {white_wins}  draws: {draws}");
    Ok(())
}

fn run_demo(depth: usize) -> Result<()> {
    println!("othello-rs: computer vs computer, lookahead {depth}\n");

    let mut game = Game::new(
        Player::computer(Color::Black, depth),
        Player::computer(Color::White, depth),
    );
    let mut record = Vec::new();
    while !game.status().is_terminal {
        let color = game.status().to_move;
        let (pt, outcome) = game.play_turn(None)?;
        record.push(str_coord(pt));
        if outcome.must_pass && !outcome.is_terminal {
            println!("{} passes", color.opponent());
        }
    }

    let status = game.status();
    println!("{}", game.board());
    println!("moves: {}", record.join(" "));
    println!("black {} white {}", status.score.0, status.score.1);
    match status.winner() {
        Some(color) => println!("{color} wins"),
        None => println!("draw"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth_bounds() {
        assert_eq!(parse_depth("1"), Ok(1));
        assert_eq!(parse_depth(&MAX_LOOKAHEAD.to_string()), Ok(MAX_LOOKAHEAD));
        assert!(parse_depth("0").is_err());
        assert!(parse_depth(&(MAX_LOOKAHEAD + 1).to_string()).is_err());
        assert!(parse_depth("deep").is_err());
    }

    #[test]
    fn test_init_logging_installs_once() {
        init_logging(1).unwrap();
        assert_eq!(log::max_level(), LevelFilter::Debug);
        // A second logger is refused and surfaces as an error
        assert!(init_logging(0).is_err());
    }
}
