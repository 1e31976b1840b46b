//! othello-rs: an Othello engine with a reusable minimax tree.
//!
//! Move generation only looks at periphery cells, the empty cells next to a
//! chip, and only walks the directions that point at a chip. The computer
//! player searches a depth-limited minimax tree and keeps it between turns,
//! re-rooting at whatever move was actually played.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, direction offsets, search defaults
//! - [`board`] - Board state, capture resolution, move execution
//! - [`search`] - Game tree and minimax evaluation
//! - [`player`] - Human and computer players
//! - [`game`] - Game driver for front ends
//! - [`protocol`] - Line-based text protocol
//! - [`error`] - Error type
//!
//! ## Example
//!
//! ```
//! use othello_rs::board::{parse_coord, str_coord, Color};
//! use othello_rs::game::Game;
//!
//! let mut game = Game::human_vs_computer(2);
//! game.play(parse_coord("d3").unwrap()).unwrap();
//!
//! let reply = game.request_ai_move(2).unwrap();
//! game.commit_move(Color::White, reply).unwrap();
//! game.notify_move_played(reply).unwrap();
//! println!("White answered {}", str_coord(reply));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod player;
pub mod protocol;
pub mod search;
