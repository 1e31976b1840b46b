//! Othello board state, capture resolution and move execution.
//!
//! The board is a 1D array of [`Cell`]s with a wall border, so a line walk
//! never needs a bounds check: it always stops on a wall, an empty cell or a
//! chip. Move generation never scans the whole grid. Every empty cell that
//! touches a chip is marked [`Cell::Periphery`] and carries a bitmask of the
//! directions that point at its occupied neighbors. Only those cells, and only
//! those directions, can ever yield a capture.

use std::fmt;

use crate::constants::{BOARD_IMAX, BOARD_IMIN, BOARDSIZE, DELTA, N, NUM_DIRECTIONS, ROOT_ID, W};
use crate::error::GameError;

/// A cell on the board, represented as an index into the padded 1D array.
pub type Point = usize;

/// Chip color. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Parse "b", "black", "w" or "white" (case-insensitive).
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    #[inline]
    fn cell(self) -> Cell {
        match self {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Contents of one cell of the padded grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    /// Empty, with at least one occupied neighbor.
    Periphery,
    /// Sentinel border; never changes.
    Wall,
}

impl Cell {
    #[inline]
    pub fn is_chip(self) -> bool {
        matches!(self, Cell::Black | Cell::White)
    }
}

/// Convert a 1-based (row, col) pair to a [`Point`].
pub fn point(row: usize, col: usize) -> Result<Point, GameError> {
    if !(1..=N).contains(&row) || !(1..=N).contains(&col) {
        return Err(GameError::OutOfBounds { row, col });
    }
    Ok(row * W + col)
}

/// Split a [`Point`] back into its (row, col) pair.
#[inline]
pub fn row_col(pt: Point) -> (usize, usize) {
    (pt / W, pt % W)
}

/// Whether `pt` is one of the 64 playable cells.
pub fn is_on_board(pt: Point) -> bool {
    let (row, col) = row_col(pt);
    pt < BOARDSIZE && (1..=N).contains(&row) && (1..=N).contains(&col)
}

/// All 64 playable points in row-major order.
pub fn points() -> impl Iterator<Item = Point> {
    (BOARD_IMIN..=BOARD_IMAX).filter(|&pt| is_on_board(pt))
}

/// Step one cell from `pt` in direction `dir`.
#[inline]
pub fn step(pt: Point, dir: usize) -> Point {
    (pt as isize + DELTA[dir]) as usize
}

/// Get all 8 neighbors of a point, in compass order.
#[inline]
pub fn all_neighbors(pt: Point) -> [Point; NUM_DIRECTIONS] {
    std::array::from_fn(|dir| step(pt, dir))
}

/// The direction pointing back the way `dir` came.
#[inline]
fn reverse(dir: usize) -> usize {
    (dir + NUM_DIRECTIONS / 2) % NUM_DIRECTIONS
}

/// Parse a coordinate such as `"d3"` (column letter, then row) or `"3,4"`
/// (row, then column). `"d3"` and `"3,4"` name the same cell.
pub fn parse_coord(s: &str) -> Result<Point, GameError> {
    let s = s.trim();
    let invalid = || GameError::InvalidCoordinate(s.to_string());

    if let Some((row, col)) = s.split_once(',') {
        let row = row.trim().parse::<usize>().map_err(|_| invalid())?;
        let col = col.trim().parse::<usize>().map_err(|_| invalid())?;
        return point(row, col);
    }

    let bytes = s.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_alphabetic() {
        return Err(invalid());
    }
    let col = (bytes[0].to_ascii_lowercase() - b'a' + 1) as usize;
    let row = s[1..].parse::<usize>().map_err(|_| invalid())?;
    point(row, col)
}

/// Format a point as `"d3"`. The root sentinel formats as `"root"`.
pub fn str_coord(pt: Point) -> String {
    if pt == ROOT_ID {
        return "root".into();
    }
    if !is_on_board(pt) {
        return format!("#{pt}");
    }
    let (row, col) = row_col(pt);
    format!("{}{row}", (b'a' + col as u8 - 1) as char)
}

/// Othello board state.
///
/// Besides the grid this carries the score, the periphery index, and the
/// pass/terminal flags for the side about to move. All of it is updated
/// together by [`Board::apply_move`]; a rejected move changes nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARDSIZE],
    /// Direction bitmask per point; non-zero exactly on periphery cells.
    periphery: [u8; BOARDSIZE],
    /// Chip counts: [black, white]
    score: [u32; 2],
    must_pass: bool,
    is_terminal: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position, Black to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        let mid = N / 2;
        board.place(mid * W + mid, Color::White);
        board.place(mid * W + mid + 1, Color::Black);
        board.place((mid + 1) * W + mid, Color::Black);
        board.place((mid + 1) * W + mid + 1, Color::White);
        board.update_pass_state(Color::White);
        board
    }

    /// Build a board from 8 rows of `X` (black), `O` (white) and `.` (empty).
    /// Whitespace between rows is ignored. `to_move` is the side about to
    /// move; the pass/terminal flags are computed for it.
    pub fn from_layout(layout: &str, to_move: Color) -> Result<Self, GameError> {
        let chars: Vec<char> = layout.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != N * N {
            return Err(GameError::InvalidLayout(format!(
                "expected {} cells, got {}",
                N * N,
                chars.len()
            )));
        }

        let mut board = Self::empty();
        for (i, &ch) in chars.iter().enumerate() {
            let pt = (i / N + 1) * W + i % N + 1;
            match ch {
                'X' | 'x' | 'B' | 'b' => board.place(pt, Color::Black),
                'O' | 'o' | 'W' | 'w' => board.place(pt, Color::White),
                '.' | '-' => {}
                other => {
                    return Err(GameError::InvalidLayout(format!(
                        "unexpected '{other}' at {}",
                        str_coord(pt)
                    )));
                }
            }
        }
        board.update_pass_state(to_move.opponent());
        Ok(board)
    }

    fn empty() -> Self {
        let mut cells = [Cell::Wall; BOARDSIZE];
        for pt in points() {
            cells[pt] = Cell::Empty;
        }
        Board {
            cells,
            periphery: [0; BOARDSIZE],
            score: [0, 0],
            must_pass: false,
            is_terminal: false,
        }
    }

    /// Put a chip down without any capture logic (setup only).
    fn place(&mut self, pt: Point, color: Color) {
        self.cells[pt] = color.cell();
        self.score[color.index()] += 1;
        self.update_periphery(pt);
    }

    #[inline]
    pub fn cell(&self, pt: Point) -> Cell {
        self.cells.get(pt).copied().unwrap_or(Cell::Wall)
    }

    /// (black count, white count)
    pub fn score(&self) -> (u32, u32) {
        (self.score[0], self.score[1])
    }

    pub fn count(&self, color: Color) -> u32 {
        self.score[color.index()]
    }

    /// The side about to move has no legal move and must pass.
    pub fn must_pass(&self) -> bool {
        self.must_pass
    }

    /// Neither side has a legal move.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    pub fn is_periphery(&self, pt: Point) -> bool {
        pt < BOARDSIZE && self.periphery[pt] != 0
    }

    /// Periphery cells in row-major order.
    pub fn periphery_points(&self) -> impl Iterator<Item = Point> + '_ {
        (BOARD_IMIN..=BOARD_IMAX).filter(|&pt| self.periphery[pt] != 0)
    }

    /// Recorded directions of a periphery cell, in compass order.
    pub fn periphery_directions(&self, pt: Point) -> impl Iterator<Item = usize> {
        let mask = if pt < BOARDSIZE { self.periphery[pt] } else { 0 };
        (0..NUM_DIRECTIONS).filter(move |dir| mask & (1 << dir) != 0)
    }

    /// Chips that `color` would flip by playing at `pt`.
    ///
    /// Empty if `pt` is not a periphery cell or no direction yields a capture.
    /// Runs are concatenated in compass order of the recorded directions, and
    /// each run is listed in walk order, nearest chip first.
    pub fn legal_captures(&self, color: Color, pt: Point) -> Vec<Point> {
        let mut captures = Vec::new();
        if self.cell(pt) != Cell::Periphery {
            return captures;
        }
        for dir in self.periphery_directions(pt) {
            self.search_line(color, pt, dir, &mut captures);
        }
        captures
    }

    /// Walk from `pt` in one direction, appending the flanked run to `out`.
    fn search_line(&self, color: Color, pt: Point, dir: usize, out: &mut Vec<Point>) {
        let own = color.cell();
        let opp = color.opponent().cell();

        let mut cur = step(pt, dir);
        if self.cells[cur] != opp {
            return;
        }

        let start = out.len();
        loop {
            match self.cells[cur] {
                c if c == opp => out.push(cur),
                c if c == own => return,
                // Empty, periphery or wall: nothing flanked this way
                _ => {
                    out.truncate(start);
                    return;
                }
            }
            cur = step(cur, dir);
        }
    }

    /// Points where `color` has at least one capture, row-major.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.periphery_points()
            .filter(|&pt| !self.legal_captures(color, pt).is_empty())
            .collect()
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.periphery_points()
            .any(|pt| !self.legal_captures(color, pt).is_empty())
    }

    /// Play `color` at `pt`.
    ///
    /// `captures` may be supplied when the caller already computed them with
    /// [`Board::legal_captures`] on this same board; otherwise they are
    /// computed here. Fails with [`GameError::IllegalMove`], leaving the board
    /// untouched, when `pt` is not a periphery cell, nothing is captured, or a
    /// supplied capture is not an opponent chip.
    pub fn apply_move(
        &mut self,
        color: Color,
        pt: Point,
        captures: Option<&[Point]>,
    ) -> Result<(), GameError> {
        if self.cell(pt) != Cell::Periphery {
            return Err(GameError::IllegalMove { point: pt });
        }
        let computed;
        let captures = match captures {
            Some(c) => c,
            None => {
                computed = self.legal_captures(color, pt);
                &computed[..]
            }
        };
        if captures.is_empty() {
            return Err(GameError::IllegalMove { point: pt });
        }
        // Every flipped point must be a distinct opponent chip
        let opp = color.opponent().cell();
        let bad = captures
            .iter()
            .enumerate()
            .any(|(i, &c)| self.cell(c) != opp || captures[..i].contains(&c));
        if bad {
            return Err(GameError::IllegalMove { point: pt });
        }

        self.cells[pt] = color.cell();
        for &c in captures {
            self.cells[c] = color.cell();
        }

        let flipped = captures.len() as u32;
        self.score[color.index()] += flipped + 1;
        self.score[color.opponent().index()] -= flipped;

        self.update_periphery(pt);
        self.update_pass_state(color);
        Ok(())
    }

    /// `pt` just became occupied: drop it from the index and mark its empty
    /// neighbors as periphery pointing back at it.
    fn update_periphery(&mut self, pt: Point) {
        self.periphery[pt] = 0;
        for (dir, n) in all_neighbors(pt).into_iter().enumerate() {
            match self.cells[n] {
                Cell::Empty | Cell::Periphery => {
                    self.cells[n] = Cell::Periphery;
                    self.periphery[n] |= 1 << reverse(dir);
                }
                _ => {}
            }
        }
    }

    /// Recompute the flags after `mover` played.
    ///
    /// The opponent is checked first. Only if it has no move is the mover
    /// checked as well; the state is terminal when both come up empty.
    fn update_pass_state(&mut self, mover: Color) {
        let acting = mover.opponent();
        if self.has_legal_move(acting) {
            self.must_pass = false;
            self.is_terminal = false;
        } else {
            self.must_pass = true;
            self.is_terminal = !self.has_legal_move(mover);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..N {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 1..=N {
            write!(f, "{row}")?;
            for col in 1..=N {
                let ch = match self.cells[row * W + col] {
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    _ => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
