//! Depth-limited minimax over a lazily expanded game tree.
//!
//! Each [`StateNode`] owns a private copy of the board it represents. Children
//! are created on demand, one per legal move, and survive across turns: after a
//! move is committed the tree is re-rooted at the matching child and everything
//! already expanded below it is reused.
//!
//! Values are always from Black's point of view. A terminal win for Black is
//! `+inf`, a win for White `-inf`, a draw `0`.

use crate::board::{Board, Color, Point};

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    /// The move that produced this position (`ROOT_ID` for the initial root)
    pub id: Point,
    /// Private board snapshot; never shared with the committed game board
    pub board: Board,
    /// Child nodes in row-major move order
    pub children: Vec<StateNode>,
    /// Color the children were generated for
    pub expanded_for: Option<Color>,
    /// Last computed value
    pub value: Option<f64>,
}

impl StateNode {
    pub fn new(id: Point, board: Board) -> Self {
        Self {
            id,
            board,
            children: Vec::new(),
            expanded_for: None,
            value: None,
        }
    }

    /// Static evaluation at the search horizon: Black's chip count.
    #[inline]
    pub fn heuristic(&self) -> f64 {
        self.board.count(Color::Black) as f64
    }

    pub fn child(&self, id: Point) -> Option<&StateNode> {
        self.children.iter().find(|c| c.id == id)
    }

    /// Index of the child reached by playing `id`.
    pub fn child_index(&self, id: Point) -> Option<usize> {
        self.children.iter().position(|c| c.id == id)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(StateNode::size).sum::<usize>()
    }

    /// Create one child per legal move of `color`.
    ///
    /// Does nothing if the node already has children, or was already expanded
    /// for `color`.
    pub fn populate_children(&mut self, color: Color) {
        if !self.children.is_empty() || self.expanded_for == Some(color) {
            return;
        }

        for pt in self.board.periphery_points() {
            let captures = self.board.legal_captures(color, pt);
            if captures.is_empty() {
                continue;
            }
            let mut next = self.board.clone();
            if next.apply_move(color, pt, Some(captures.as_slice())).is_ok() {
                self.children.push(StateNode::new(pt, next));
            }
        }
        self.expanded_for = Some(color);
    }

    /// Minimax value of this node.
    ///
    /// `color` is the side whose move produced this node; its opponent moves
    /// next. `depth` starts at 1 and the static heuristic takes over once it
    /// exceeds `max_depth`. Black nodes keep the largest child value and White
    /// nodes the smallest. On ties the first child in row-major order wins.
    pub fn evaluate(&mut self, color: Color, max_depth: usize, depth: usize) -> f64 {
        self.search(color, max_depth, depth, false)
    }

    /// `passed` is set once the side to move at this node has already been
    /// skipped, so the pass flag is not applied a second time.
    fn search(&mut self, color: Color, max_depth: usize, depth: usize, passed: bool) -> f64 {
        let value = if depth > max_depth {
            self.heuristic()
        } else if self.board.is_terminal() {
            terminal_value(&self.board)
        } else if self.board.must_pass() && !passed {
            // Turn skipped: same position, other side
            self.search(color.opponent(), max_depth, depth + 1, true)
        } else {
            let to_move = color.opponent();
            self.populate_children(to_move);

            let mut best: Option<f64> = None;
            for child in &mut self.children {
                let v = child.evaluate(to_move, max_depth, depth + 1);
                if best.is_none_or(|b| improves(color, v, b)) {
                    best = Some(v);
                }
            }
            best.unwrap_or_else(|| self.heuristic())
        };

        self.value = Some(value);
        value
    }
}

/// Value of a finished game from Black's perspective.
pub fn terminal_value(board: &Board) -> f64 {
    let (black, white) = board.score();
    if black > white {
        f64::INFINITY
    } else if white > black {
        f64::NEG_INFINITY
    } else {
        0.0
    }
}

/// Whether `candidate` strictly beats `best` for `color`.
#[inline]
pub fn improves(color: Color, candidate: f64, best: f64) -> bool {
    match color {
        Color::Black => candidate > best,
        Color::White => candidate < best,
    }
}

/// Index of the first child whose cached value is extremal for `color`.
///
/// Children without a value are skipped. Returns `None` if no child has one.
pub fn best_child(children: &[StateNode], color: Color) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, child) in children.iter().enumerate() {
        let Some(v) = child.value else { continue };
        if best.is_none_or(|(_, b)| improves(color, v, b)) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::point;
    use crate::constants::ROOT_ID;

    fn pt(row: usize, col: usize) -> Point {
        point(row, col).unwrap()
    }

    fn layout(rows: &str, to_move: Color) -> Board {
        Board::from_layout(rows, to_move).unwrap()
    }

    #[test]
    fn test_populate_initial() {
        let mut root = StateNode::new(ROOT_ID, Board::new());
        root.populate_children(Color::Black);
        let ids: Vec<Point> = root.children.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![pt(3, 4), pt(4, 3), pt(5, 6), pt(6, 5)]);
        assert_eq!(root.expanded_for, Some(Color::Black));
        for child in &root.children {
            assert_eq!(child.board.score(), (4, 1));
            assert!(child.children.is_empty());
            assert!(child.value.is_none());
        }
        // Expansion works on a copy
        assert_eq!(root.board, Board::new());
    }

    #[test]
    fn test_populate_is_idempotent() {
        let mut root = StateNode::new(ROOT_ID, Board::new());
        root.populate_children(Color::Black);
        root.children[0].value = Some(42.0);
        root.populate_children(Color::Black);
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.children[0].value, Some(42.0));
    }

    #[test]
    fn test_horizon_uses_black_count() {
        let mut node = StateNode::new(ROOT_ID, Board::new());
        assert_eq!(node.evaluate(Color::White, 0, 1), 2.0);
        assert_eq!(node.value, Some(2.0));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_terminal_values() {
        let draw = layout(
            "O.......
             ........
             ........
             ........
             ........
             ........
             ........
             .......X",
            Color::Black,
        );
        let black_wins = layout(
            "X......X
             ........
             ........
             ........
             ........
             ........
             ........
             .......O",
            Color::Black,
        );
        let white_wins = layout(
            "O......X
             ........
             ........
             ........
             ........
             ........
             ........
             .......O",
            Color::Black,
        );
        for (board, expected) in [
            (draw, 0.0),
            (black_wins, f64::INFINITY),
            (white_wins, f64::NEG_INFINITY),
        ] {
            assert!(board.is_terminal());
            for color in [Color::Black, Color::White] {
                let mut node = StateNode::new(ROOT_ID, board.clone());
                assert_eq!(node.evaluate(color, 3, 1), expected);
            }
        }
    }

    #[test]
    fn test_pass_recurses_without_branching() {
        // White (to move) must pass; Black plays again at c1
        let board = layout(
            "XO......
             ........
             ........
             ........
             ........
             ........
             ........
             ........",
            Color::White,
        );
        let mut node = StateNode::new(ROOT_ID, board);
        // depth 1: pass, depth 2: Black's c1, depth 3: horizon
        assert_eq!(node.evaluate(Color::Black, 2, 1), 3.0);
        assert_eq!(node.expanded_for, Some(Color::Black));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].id, pt(1, 3));
    }

    #[test]
    fn test_minimax_extremes() {
        // The initial position counts as White's: it keeps Black's weakest opening
        let mut root = StateNode::new(ROOT_ID, Board::new());
        let min_value = root.evaluate(Color::White, 2, 1);
        assert_eq!(root.children.len(), 4);
        let openings: Vec<f64> = root.children.iter().map(|c| c.value.unwrap()).collect();
        let min = openings.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(min_value, min);

        // After Black d3 White has three replies; the Black node keeps the best
        let mut d3 = StateNode::new(pt(3, 4), root.children[0].board.clone());
        let max_value = d3.evaluate(Color::Black, 2, 1);
        assert_eq!(d3.children.len(), 3);
        let replies: Vec<f64> = d3.children.iter().map(|c| c.value.unwrap()).collect();
        let max = replies.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max_value, max);
    }

    #[test]
    fn test_best_child_first_extremal_wins() {
        let mut root = StateNode::new(ROOT_ID, Board::new());
        root.populate_children(Color::Black);
        let values = [3.0, 1.0, 1.0, 3.0];
        for (child, v) in root.children.iter_mut().zip(values) {
            child.value = Some(v);
        }
        assert_eq!(best_child(&root.children, Color::White), Some(1));
        assert_eq!(best_child(&root.children, Color::Black), Some(0));

        root.children[0].value = None;
        assert_eq!(best_child(&root.children, Color::Black), Some(3));
        assert_eq!(best_child(&[], Color::Black), None);
    }

    #[test]
    fn test_evaluate_leaves_root_board_untouched() {
        let mut root = StateNode::new(ROOT_ID, Board::new());
        root.evaluate(Color::White, 3, 1);
        assert_eq!(root.board, Board::new());
        assert!(root.size() > 1);
    }
}
