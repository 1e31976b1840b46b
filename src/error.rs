//! Error type shared by the board, search tree and game driver.

use thiserror::Error;

use crate::board::{Color, Point, str_coord};

fn coord(pt: &Point) -> String {
    str_coord(*pt)
}

/// Everything that can go wrong when driving a game.
///
/// None of these leave the board half-updated: a failed move is rejected
/// before any cell, score or periphery entry changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move at {}: no chips would be captured", coord(.point))]
    IllegalMove { point: Point },

    #[error("coordinate ({row}, {col}) is outside the 8x8 board")]
    OutOfBounds { row: usize, col: usize },

    #[error("search tree out of sync: {} is not a child of the current root", coord(.point))]
    InconsistentState { point: Point },

    #[error("{color} has no legal move and must pass")]
    NoLegalMove { color: Color },

    #[error("it is not {color}'s turn")]
    NotYourTurn { color: Color },

    #[error("{color} is not played by the computer")]
    NotComputer { color: Color },

    #[error("no move supplied for {color}")]
    NoMoveSupplied { color: Color },

    #[error("game is over")]
    GameOver,

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
}
