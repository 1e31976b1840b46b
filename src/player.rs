//! Human and computer players.
//!
//! A [`Player`] either relays a coordinate chosen outside the engine (the
//! human) or picks one by searching its own [`StateNode`] tree (the AI). Both
//! are told about every committed move so the AI can keep its tree in step
//! with the real board.

use log::{debug, trace};

use crate::board::{Board, Color, Point, str_coord};
use crate::constants::ROOT_ID;
use crate::error::GameError;
use crate::search::{StateNode, best_child};

/// Minimax player that reuses its search tree across turns.
#[derive(Debug)]
pub struct AiPlayer {
    color: Color,
    lookahead: usize,
    root: StateNode,
}

impl AiPlayer {
    pub fn new(color: Color, lookahead: usize) -> Self {
        Self {
            color,
            lookahead,
            root: Self::initial_root(),
        }
    }

    fn initial_root() -> StateNode {
        let mut root = StateNode::new(ROOT_ID, Board::new());
        // Black opens
        root.populate_children(Color::Black);
        root
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn set_lookahead(&mut self, lookahead: usize) {
        self.lookahead = lookahead;
    }

    /// Current root of the search tree. Its board mirrors the committed board.
    pub fn root(&self) -> &StateNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut StateNode {
        &mut self.root
    }

    /// Throw the tree away and start over from the initial position.
    pub fn reset(&mut self) {
        self.root = Self::initial_root();
    }

    /// Pick a move for the AI's color from the current root.
    ///
    /// If the root's children were already generated for this color and all
    /// carry a value from an earlier search, the best of those is returned
    /// without searching again. Otherwise every legal move is evaluated to
    /// the configured lookahead.
    pub fn choose_move(&mut self) -> Result<Point, GameError> {
        let color = self.color;
        if self.root.board.is_terminal() {
            return Err(GameError::GameOver);
        }

        let cached = self.root.expanded_for == Some(color)
            && !self.root.children.is_empty()
            && self.root.children.iter().all(|c| c.value.is_some());

        if cached {
            debug!("{color}: reusing {} cached evaluations", self.root.children.len());
        } else {
            if !self.root.children.is_empty() && self.root.expanded_for != Some(color) {
                // Expanded for the other side: only happens when we must pass
                return Err(GameError::NoLegalMove { color });
            }
            self.root.populate_children(color);
            for child in &mut self.root.children {
                let v = child.evaluate(color, self.lookahead, 1);
                trace!("{color}: {} -> {v}", str_coord(child.id));
            }
        }

        let idx = best_child(&self.root.children, color).ok_or(GameError::NoLegalMove { color })?;
        let chosen = &self.root.children[idx];
        debug!(
            "{color} chooses {} (value {:?}, tree size {})",
            str_coord(chosen.id),
            chosen.value,
            self.root.size()
        );
        Ok(chosen.id)
    }

    /// Whether [`AiPlayer::advance`] would accept `mover` playing `pt`.
    pub fn can_advance(&self, mover: Color, pt: Point) -> bool {
        if self.root.children.is_empty() {
            self.root.expanded_for != Some(mover)
                && !self.root.board.legal_captures(mover, pt).is_empty()
        } else {
            self.root.expanded_for == Some(mover) && self.root.child_index(pt).is_some()
        }
    }

    /// Re-root the tree at the child reached by `mover` playing `pt`.
    ///
    /// The root is expanded for `mover` first if it has no children yet. All
    /// sibling subtrees are dropped. Fails with
    /// [`GameError::InconsistentState`] if `pt` is not among the children,
    /// which means the tree and the real board have diverged.
    pub fn advance(&mut self, mover: Color, pt: Point) -> Result<(), GameError> {
        if self.root.children.is_empty() {
            self.root.populate_children(mover);
        } else if self.root.expanded_for != Some(mover) {
            return Err(GameError::InconsistentState { point: pt });
        }

        let idx = self
            .root
            .child_index(pt)
            .ok_or(GameError::InconsistentState { point: pt })?;
        let child = self.root.children.swap_remove(idx);
        self.root = child;
        debug!(
            "{}: re-rooted at {mover} {} ({} nodes kept)",
            self.color,
            str_coord(pt),
            self.root.size()
        );
        Ok(())
    }
}

/// A participant in the game, dispatched by variant.
#[derive(Debug)]
pub enum Player {
    /// Moves arrive from outside, already checked against the board
    Human { color: Color },
    /// Moves come from a minimax search
    Computer(AiPlayer),
}

impl Player {
    pub fn human(color: Color) -> Self {
        Player::Human { color }
    }

    pub fn computer(color: Color, lookahead: usize) -> Self {
        Player::Computer(AiPlayer::new(color, lookahead))
    }

    pub fn color(&self) -> Color {
        match self {
            Player::Human { color } => *color,
            Player::Computer(ai) => ai.color(),
        }
    }

    pub fn is_computer(&self) -> bool {
        matches!(self, Player::Computer(_))
    }

    pub fn ai(&self) -> Option<&AiPlayer> {
        match self {
            Player::Computer(ai) => Some(ai),
            Player::Human { .. } => None,
        }
    }

    pub fn ai_mut(&mut self) -> Option<&mut AiPlayer> {
        match self {
            Player::Computer(ai) => Some(ai),
            Player::Human { .. } => None,
        }
    }

    /// Produce this player's next move.
    ///
    /// A human returns `supplied` as-is; the AI ignores it and searches.
    pub fn make_move(&mut self, supplied: Option<Point>) -> Result<Point, GameError> {
        match self {
            Player::Human { color } => supplied.ok_or(GameError::NoMoveSupplied { color: *color }),
            Player::Computer(ai) => ai.choose_move(),
        }
    }

    /// Fails with [`GameError::InconsistentState`] if [`Player::observe`]
    /// would, without touching the tree.
    pub fn check_observe(&self, mover: Color, pt: Point) -> Result<(), GameError> {
        match self {
            Player::Computer(ai) if !ai.can_advance(mover, pt) => {
                Err(GameError::InconsistentState { point: pt })
            }
            _ => Ok(()),
        }
    }

    /// Tell the player that `mover` played `pt` on the real board.
    pub fn observe(&mut self, mover: Color, pt: Point) -> Result<(), GameError> {
        match self {
            Player::Human { .. } => Ok(()),
            Player::Computer(ai) => ai.advance(mover, pt),
        }
    }

    pub fn reset(&mut self) {
        if let Player::Computer(ai) = self {
            ai.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::point;

    fn pt(row: usize, col: usize) -> Point {
        point(row, col).unwrap()
    }

    #[test]
    fn test_new_ai_expands_black_openings() {
        let ai = AiPlayer::new(Color::White, 2);
        assert_eq!(ai.root().id, ROOT_ID);
        assert_eq!(ai.root().expanded_for, Some(Color::Black));
        assert_eq!(ai.root().children.len(), 4);
    }

    #[test]
    fn test_advance_reroots_and_drops_siblings() {
        let mut ai = AiPlayer::new(Color::White, 2);
        ai.advance(Color::Black, pt(3, 4)).unwrap();
        assert_eq!(ai.root().id, pt(3, 4));
        assert_eq!(ai.root().size(), 1);
        assert_eq!(ai.root().board.score(), (4, 1));
    }

    #[test]
    fn test_advance_unknown_move_is_inconsistent() {
        let mut ai = AiPlayer::new(Color::White, 2);
        assert_eq!(
            ai.advance(Color::Black, pt(1, 1)),
            Err(GameError::InconsistentState { point: pt(1, 1) })
        );
        // Wrong mover for an already expanded root
        assert_eq!(
            ai.advance(Color::White, pt(3, 4)),
            Err(GameError::InconsistentState { point: pt(3, 4) })
        );
        // Tree is left as it was
        assert_eq!(ai.root().id, ROOT_ID);
        assert_eq!(ai.root().children.len(), 4);
    }

    #[test]
    fn test_can_advance_matches_advance() {
        let mut ai = AiPlayer::new(Color::White, 1);
        assert!(ai.can_advance(Color::Black, pt(3, 4)));
        assert!(!ai.can_advance(Color::Black, pt(1, 1)));
        assert!(!ai.can_advance(Color::White, pt(3, 4)));

        // Unexpanded root: judged by the board
        ai.advance(Color::Black, pt(3, 4)).unwrap();
        assert!(ai.can_advance(Color::White, pt(3, 3)));
        assert!(!ai.can_advance(Color::White, pt(3, 4)));

        let player = Player::Computer(ai);
        assert_eq!(
            player.check_observe(Color::White, pt(3, 4)),
            Err(GameError::InconsistentState { point: pt(3, 4) })
        );
        assert!(player.check_observe(Color::White, pt(3, 3)).is_ok());
        assert!(Player::human(Color::Black).check_observe(Color::Black, pt(1, 1)).is_ok());
    }

    #[test]
    fn test_choose_move_is_legal_and_minimizes() {
        let mut ai = AiPlayer::new(Color::White, 2);
        ai.advance(Color::Black, pt(3, 4)).unwrap();
        let mv = ai.choose_move().unwrap();
        assert!(ai.root().board.legal_moves(Color::White).contains(&mv));

        let chosen = ai.root().child(mv).unwrap().value.unwrap();
        for child in &ai.root().children {
            assert!(chosen <= child.value.unwrap());
        }
    }

    #[test]
    fn test_choose_move_reuses_cached_values() {
        let mut ai = AiPlayer::new(Color::White, 2);
        ai.advance(Color::Black, pt(3, 4)).unwrap();
        let first = ai.choose_move().unwrap();
        let size = ai.root().size();

        // Same answer, no new nodes
        let second = ai.choose_move().unwrap();
        assert_eq!(first, second);
        assert_eq!(ai.root().size(), size);
    }

    #[test]
    fn test_black_ai_maximizes() {
        let mut ai = AiPlayer::new(Color::Black, 1);
        let mv = ai.choose_move().unwrap();
        let chosen = ai.root().child(mv).unwrap().value.unwrap();
        for child in &ai.root().children {
            assert!(chosen >= child.value.unwrap());
        }
    }

    #[test]
    fn test_human_relays_supplied_move() {
        let mut human = Player::human(Color::Black);
        assert_eq!(human.make_move(Some(pt(3, 4))), Ok(pt(3, 4)));
        assert_eq!(
            human.make_move(None),
            Err(GameError::NoMoveSupplied { color: Color::Black })
        );
        assert!(human.observe(Color::Black, pt(1, 1)).is_ok());
        assert!(!human.is_computer());
        assert!(human.ai().is_none());
    }

    #[test]
    fn test_computer_player_dispatch() {
        let mut player = Player::computer(Color::White, 1);
        assert!(player.is_computer());
        assert_eq!(player.color(), Color::White);
        player.observe(Color::Black, pt(6, 5)).unwrap();
        let mv = player.make_move(None).unwrap();
        assert!(player.ai().unwrap().root().child(mv).is_some());

        player.reset();
        assert_eq!(player.ai().unwrap().root().id, ROOT_ID);
    }
}
