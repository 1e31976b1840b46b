//! Line-based text protocol for driving a [`Game`] from a terminal or a GUI.
//!
//! Framing follows GTP: one command per line, an optional numeric id in front,
//! and each response is `=id message` (success) or `?id message` (failure)
//! followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `clear_board` - Start a new game
//! - `showboard` - Print the board
//! - `status` - Score, turn number, side to move, pass and end flags
//! - `legal [color]` - Legal moves for `color` (default: side to move)
//! - `play <color> <coord>` - Commit a move, e.g. `play black d3`
//! - `genmove` - Let the computer move for the side to move
//! - `depth <n>` - Set the computer's lookahead
//!
//! ## Example
//!
//! ```ignore
//! use othello_rs::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new(2);
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::board::{Color, parse_coord, str_coord};
use crate::constants::MAX_LOOKAHEAD;
use crate::game::{Game, Status};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "depth",
    "genmove",
    "known_command",
    "legal",
    "list_commands",
    "name",
    "play",
    "quit",
    "showboard",
    "status",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    game: Game,
    /// Lookahead handed to the computer on `genmove`
    lookahead: usize,
}

impl ProtocolEngine {
    /// Human Black against a computer White.
    pub fn new(lookahead: usize) -> Self {
        Self::with_game(Game::human_vs_computer(lookahead), lookahead)
    }

    pub fn with_game(game: Game, lookahead: usize) -> Self {
        Self { game, lookahead }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.game.reset();
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "status" => (true, format_status(&self.game.status())),

            "legal" => {
                let color = match args.first() {
                    Some(s) => match Color::parse(s) {
                        Some(c) => c,
                        None => return (false, format!("invalid color '{s}'")),
                    },
                    None => self.game.status().to_move,
                };
                let moves: Vec<String> = self
                    .game
                    .legal_moves(color)
                    .into_iter()
                    .map(str_coord)
                    .collect();
                (true, moves.join(" "))
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Color::parse(args[0]) else {
                    return (false, format!("invalid color '{}'", args[0]));
                };
                let pt = match parse_coord(args[1]) {
                    Ok(pt) => pt,
                    Err(e) => return (false, e.to_string()),
                };
                let result = self
                    .game
                    .commit_move(color, pt)
                    .and_then(|_| self.game.notify_move_played(pt));
                match result {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let result = self.game.request_ai_move(self.lookahead).and_then(|pt| {
                    self.game.commit_move(self.game.status().to_move, pt)?;
                    self.game.notify_move_played(pt)?;
                    Ok(pt)
                });
                match result {
                    Ok(pt) => (true, str_coord(pt)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "depth" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(d) if (1..=MAX_LOOKAHEAD).contains(&d) => {
                        self.lookahead = d;
                        (true, String::new())
                    }
                    Ok(d) => (false, format!("depth must be 1..={MAX_LOOKAHEAD} (got {d})")),
                    Err(_) => (false, "invalid depth".to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

fn format_status(status: &Status) -> String {
    let (black, white) = status.score;
    format!(
        "black {black} white {white} turn {} to_move {} must_pass {} terminal {}",
        status.turn, status.to_move, status.must_pass, status.is_terminal
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 status");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "status");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("status");
        assert_eq!(id, None);
        assert_eq!(cmd, "status");
    }

    #[test]
    fn test_known_command() {
        let mut engine = ProtocolEngine::new(1);
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".into()));
        assert_eq!(engine.execute("known_command", &["boardsize"]), (true, "false".into()));
        assert!(!engine.execute("known_command", &[]).0);
    }

    #[test]
    fn test_legal_and_status() {
        let mut engine = ProtocolEngine::new(1);
        assert_eq!(engine.execute("legal", &[]), (true, "d3 c4 f5 e6".into()));
        assert_eq!(
            engine.execute("status", &[]),
            (
                true,
                "black 2 white 2 turn 1 to_move black must_pass false terminal false".into()
            )
        );
        assert!(!engine.execute("legal", &["green"]).0);
    }

    #[test]
    fn test_play_and_genmove() {
        let mut engine = ProtocolEngine::new(1);
        assert!(engine.execute("play", &["black", "d3"]).0);

        let (success, response) = engine.execute("genmove", &[]);
        assert!(success);
        assert!(parse_coord(&response).is_ok());
        assert_eq!(engine.game().status().turn, 3);

        // Black's turn again; the computer does not play Black
        let (success, response) = engine.execute("genmove", &[]);
        assert!(!success);
        assert!(response.contains("computer"));
    }

    #[test]
    fn test_play_rejections() {
        let mut engine = ProtocolEngine::new(1);
        assert!(!engine.execute("play", &["black"]).0);
        assert!(!engine.execute("play", &["black", "a1"]).0);
        assert!(!engine.execute("play", &["white", "d3"]).0);
        assert!(!engine.execute("play", &["black", "j9"]).0);
        assert_eq!(engine.game().status().turn, 1);
    }

    #[test]
    fn test_depth() {
        let mut engine = ProtocolEngine::new(1);
        assert!(engine.execute("depth", &["3"]).0);
        assert!(!engine.execute("depth", &["0"]).0);
        assert!(!engine.execute("depth", &["99"]).0);
        assert!(!engine.execute("depth", &["x"]).0);
    }

    #[test]
    fn test_run_session() {
        let mut engine = ProtocolEngine::new(1);
        let input = "1 name\nplay black d3\n# comment\n\n2 showboard\nquit\nstatus\n";
        let mut output = Vec::new();
        engine.run(input.as_bytes(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("=1 othello-rs\n\n"));
        assert!(text.contains("=2 \n  a b c d e f g h\n"));
        // Nothing after quit is answered
        assert!(!text.contains("turn"));
    }
}
