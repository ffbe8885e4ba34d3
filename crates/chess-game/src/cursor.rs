//! Navigation and editing handles into a game tree.

use std::ops::Deref;

use chess_rules::{Color, Move, Position};

use crate::error::GameError;
use crate::game::Game;
use crate::tree::{GameNode, NodeId};

/// A read cursor: a position in the tree of a specific game.
///
/// Supports navigation and read access only. Cursors are cheap to clone and
/// several may point into the same game at once.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    game: &'a Game,
    node: GameNode,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(game: &'a Game, node: GameNode) -> Cursor<'a> {
        Cursor { game, node }
    }

    /// Returns the game this cursor points into.
    pub fn game(&self) -> &'a Game {
        self.game
    }

    /// Returns a handle to the node the cursor points at.
    pub fn node(&self) -> GameNode {
        self.node.clone()
    }

    /// Returns the id of the current node.
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    /// Returns the move that led to the current node, or `None` at the root.
    pub fn mov(&self) -> Option<Move> {
        self.node.mov()
    }

    /// Moves to the parent node, or returns `None` at the root.
    pub fn parent(&self) -> Option<Cursor<'a>> {
        self.node
            .parent()
            .map(|node| Cursor::new(self.game, node))
    }

    /// Moves to the child at `index` (0 is the main line), or returns `None`
    /// if there is no such child.
    pub fn child(&self, index: usize) -> Option<Cursor<'a>> {
        self.node
            .child(index)
            .map(|node| Cursor::new(self.game, node))
    }

    /// Returns the number of children of the current node.
    pub fn child_count(&self) -> usize {
        self.node.child_count()
    }

    /// Returns true if alternatives to the main continuation exist here.
    pub fn has_variations(&self) -> bool {
        self.child_count() > 1
    }

    /// Returns true if the current node is the first move of a variation,
    /// i.e. it has a parent and is not the parent's main-line child.
    pub fn starts_variation(&self) -> bool {
        match self.node.parent() {
            Some(parent) => parent.child(0).as_ref() != Some(&self.node),
            None => false,
        }
    }

    /// Returns the index of the current node among its siblings, or 0 at the
    /// root.
    pub fn variation_number(&self) -> usize {
        self.node
            .parent()
            .and_then(|parent| parent.child_index(&self.node))
            .unwrap_or(0)
    }

    /// Returns the side to move in the current node's position.
    pub fn side_to_move(&self) -> Color {
        match self.node.mov() {
            Some(mov) => !mov.piece.color,
            None => self
                .node
                .cached_position()
                .expect("the root always caches its position")
                .side_to_move(),
        }
    }

    /// Returns the color that played the move leading here, or `None` at the
    /// root.
    pub fn player_color(&self) -> Option<Color> {
        self.node.mov().map(|mov| mov.piece.color)
    }

    /// Returns the position of the current node.
    ///
    /// Uses the node's cached position when present; otherwise reconstructs
    /// it by replaying moves from the nearest cached ancestor and stores the
    /// result on the node so later lookups are cheap.
    pub fn position(&self) -> Result<Position, GameError> {
        if let Some(position) = self.node.cached_position() {
            return Ok(position);
        }
        let position = self.node.compute_position()?;
        self.node.set_position(position.clone());
        Ok(position)
    }

    /// Returns the post-move comment of the current node.
    pub fn comment(&self) -> String {
        self.node.comment()
    }

    /// Returns the pre-move comment of the current node.
    pub fn premove_comment(&self) -> String {
        self.node.premove_comment()
    }

    /// Returns the NAGs of the current node.
    pub fn nags(&self) -> Vec<u16> {
        self.node.nags()
    }
}

/// An edit cursor: a [`Cursor`] that can also grow and annotate the tree.
///
/// Obtained from [`Game::edit`], which borrows the game mutably; all edit
/// cursors derived from it share that borrow. Every read operation of
/// [`Cursor`] is available through deref.
#[derive(Debug, Clone)]
pub struct CursorMut<'a> {
    inner: Cursor<'a>,
}

impl<'a> CursorMut<'a> {
    pub(crate) fn new(game: &'a Game, node: GameNode) -> CursorMut<'a> {
        CursorMut {
            inner: Cursor::new(game, node),
        }
    }

    /// Projects the edit cursor to a read cursor at the same node.
    pub fn as_read(&self) -> Cursor<'a> {
        self.inner.clone()
    }

    /// Consumes the edit cursor, leaving a read cursor at the same node.
    pub fn into_read(self) -> Cursor<'a> {
        self.inner
    }

    /// Plays a move at the current position.
    ///
    /// Appends a child for `mov` (or re-uses the existing child reached by
    /// the same move) and returns an edit cursor at it.
    pub fn play_move(&self, mov: Move) -> CursorMut<'a> {
        let node = self.inner.game.add_node(&self.inner.node, mov);
        CursorMut::new(self.inner.game, node)
    }

    /// Starts a variation of the move leading to the current node.
    ///
    /// The new line branches at the parent: a sibling of the current node is
    /// created for `mov`. Fails with [`GameError::NoParent`] at the root.
    pub fn add_variation(&self, mov: Move) -> Result<CursorMut<'a>, GameError> {
        let parent = self.inner.node.parent().ok_or(GameError::NoParent)?;
        let node = self.inner.game.add_node(&parent, mov);
        Ok(CursorMut::new(self.inner.game, node))
    }

    /// Moves to the parent node, keeping edit capability.
    pub fn parent_mut(&self) -> Option<CursorMut<'a>> {
        self.inner
            .node
            .parent()
            .map(|node| CursorMut::new(self.inner.game, node))
    }

    /// Moves to the child at `index`, keeping edit capability.
    pub fn child_mut(&self, index: usize) -> Option<CursorMut<'a>> {
        self.inner
            .node
            .child(index)
            .map(|node| CursorMut::new(self.inner.game, node))
    }

    /// Replaces the post-move comment of the current node.
    pub fn set_comment(&self, comment: impl Into<String>) {
        self.inner.node.set_comment(comment);
    }

    /// Appends to the post-move comment of the current node.
    pub fn append_comment(&self, comment: &str) {
        self.inner.node.append_comment(comment);
    }

    /// Replaces the pre-move comment of the current node.
    pub fn set_premove_comment(&self, comment: impl Into<String>) {
        self.inner.node.set_premove_comment(comment);
    }

    /// Appends to the pre-move comment of the current node.
    pub fn append_premove_comment(&self, comment: &str) {
        self.inner.node.append_premove_comment(comment);
    }

    /// Appends a numeric annotation glyph to the current node.
    pub fn push_nag(&self, nag: u16) {
        self.inner.node.push_nag(nag);
    }
}

impl<'a> Deref for CursorMut<'a> {
    type Target = Cursor<'a>;

    fn deref(&self) -> &Cursor<'a> {
        &self.inner
    }
}
