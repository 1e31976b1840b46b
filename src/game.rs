//! The game driver: the only surface a presentation layer needs.
//!
//! [`Game`] owns the committed board and both players. A front end asks it for
//! legal moves, commits moves, asks the computer for its move, and reports
//! every committed move back so the computer's search tree stays in step.

use log::debug;

use crate::board::{Board, Color, Point, is_on_board, row_col, str_coord};
use crate::constants::ROOT_ID;
use crate::error::GameError;
use crate::player::Player;

/// Result of a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// (black, white)
    pub score: (u32, u32),
    pub captured: usize,
    /// The side that would move next has no move and is skipped
    pub must_pass: bool,
    pub is_terminal: bool,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// (black, white)
    pub score: (u32, u32),
    /// Starts at 1, +1 per committed move
    pub turn: u32,
    pub to_move: Color,
    pub must_pass: bool,
    pub is_terminal: bool,
}

impl Status {
    /// Winner of a finished game, `None` for a draw or a game in progress.
    pub fn winner(&self) -> Option<Color> {
        if !self.is_terminal {
            return None;
        }
        let (black, white) = self.score;
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

pub struct Game {
    board: Board,
    to_move: Color,
    turn: u32,
    last_move: Option<(Color, Point)>,
    black: Player,
    white: Player,
}

impl Game {
    pub fn new(black: Player, white: Player) -> Self {
        debug_assert_eq!(black.color(), Color::Black);
        debug_assert_eq!(white.color(), Color::White);
        Self {
            board: Board::new(),
            to_move: Color::Black,
            turn: 1,
            last_move: None,
            black,
            white,
        }
    }

    /// Human Black against a computer White.
    pub fn human_vs_computer(lookahead: usize) -> Self {
        Self::new(
            Player::human(Color::Black),
            Player::computer(Color::White, lookahead),
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn player_mut(&mut self, color: Color) -> &mut Player {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    /// Points where `color` could legally play now.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.board.legal_moves(color)
    }

    /// Apply `color`'s move at `pt` to the real board.
    ///
    /// Does not touch the players; call [`Game::notify_move_played`] next.
    pub fn commit_move(&mut self, color: Color, pt: Point) -> Result<MoveOutcome, GameError> {
        if !is_on_board(pt) {
            let (row, col) = row_col(pt);
            return Err(GameError::OutOfBounds { row, col });
        }
        if self.board.is_terminal() {
            return Err(GameError::GameOver);
        }
        if color != self.to_move {
            return Err(GameError::NotYourTurn { color });
        }

        let captures = self.board.legal_captures(color, pt);
        self.board.apply_move(color, pt, Some(captures.as_slice()))?;
        self.turn += 1;
        self.last_move = Some((color, pt));

        // A skipped opponent hands the turn straight back
        if !self.board.must_pass() || self.board.is_terminal() {
            self.to_move = color.opponent();
        }

        let outcome = MoveOutcome {
            score: self.board.score(),
            captured: captures.len(),
            must_pass: self.board.must_pass(),
            is_terminal: self.board.is_terminal(),
        };
        debug!(
            "turn {}: {color} {} flips {} -> {:?}",
            self.turn - 1,
            str_coord(pt),
            outcome.captured,
            outcome.score
        );
        Ok(outcome)
    }

    /// The computer's choice for the side to move, searched at `lookahead`.
    pub fn request_ai_move(&mut self, lookahead: usize) -> Result<Point, GameError> {
        if self.board.is_terminal() {
            return Err(GameError::GameOver);
        }
        let color = self.to_move;
        let ai = self
            .player(color)
            .ai()
            .ok_or(GameError::NotComputer { color })?;
        // The last commit was never reported
        if ai.root().board != self.board {
            let point = self.last_move.map_or(ROOT_ID, |(_, pt)| pt);
            return Err(GameError::InconsistentState { point });
        }

        let ai = self
            .player_mut(color)
            .ai_mut()
            .ok_or(GameError::NotComputer { color })?;
        if ai.lookahead() != lookahead {
            debug!("{color}: lookahead {} -> {lookahead}", ai.lookahead());
            ai.set_lookahead(lookahead);
        }
        ai.choose_move()
    }

    /// Report that the last committed move was `pt`, re-rooting every
    /// computer player's tree.
    ///
    /// Both trees are checked first, so on error neither has moved.
    pub fn notify_move_played(&mut self, pt: Point) -> Result<(), GameError> {
        let mover = match self.last_move {
            Some((mover, last)) if last == pt => mover,
            _ => return Err(GameError::InconsistentState { point: pt }),
        };
        self.black.check_observe(mover, pt)?;
        self.white.check_observe(mover, pt)?;
        self.black.observe(mover, pt)?;
        self.white.observe(mover, pt)
    }

    pub fn status(&self) -> Status {
        Status {
            score: self.board.score(),
            turn: self.turn,
            to_move: self.to_move,
            must_pass: self.board.must_pass(),
            is_terminal: self.board.is_terminal(),
        }
    }

    /// Back to the initial position, with fresh search trees.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Color::Black;
        self.turn = 1;
        self.last_move = None;
        self.black.reset();
        self.white.reset();
    }

    /// Commit and report a move for the side to move.
    pub fn play(&mut self, pt: Point) -> Result<MoveOutcome, GameError> {
        let outcome = self.commit_move(self.to_move, pt)?;
        self.notify_move_played(pt)?;
        Ok(outcome)
    }

    /// Let the side to move pick, then commit and report its move.
    ///
    /// A human player must have supplied the move in `supplied`.
    pub fn play_turn(
        &mut self,
        supplied: Option<Point>,
    ) -> Result<(Point, MoveOutcome), GameError> {
        if self.board.is_terminal() {
            return Err(GameError::GameOver);
        }
        let color = self.to_move;
        let pt = self.player_mut(color).make_move(supplied)?;
        let outcome = self.play(pt)?;
        Ok((pt, outcome))
    }
}
