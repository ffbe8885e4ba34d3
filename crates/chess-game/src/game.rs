//! A single game of chess: metadata plus the move tree.

use std::cell::Cell;

use chess_rules::{Move, Position};

use crate::cursor::{Cursor, CursorMut};
use crate::error::GameError;
use crate::metadata::GameMetadata;
use crate::tree::{GameNode, NodeId};

/// A game of chess.
///
/// Owns the metadata tag list and the root of the move tree, and hands out
/// node ids. The tree is append-only: nodes are created through
/// [`Game::add_node`] (usually via an edit cursor) and live until the game is
/// dropped.
#[derive(Debug)]
pub struct Game {
    metadata: GameMetadata,
    root: GameNode,
    next_id: Cell<u32>,
}

impl Game {
    /// Creates a game starting from the standard position.
    pub fn new() -> Game {
        Game {
            metadata: GameMetadata::new(),
            root: GameNode::new_root(Position::standard_starting()),
            next_id: Cell::new(NodeId::ROOT.value() + 1),
        }
    }

    /// Creates a game from metadata.
    ///
    /// A `FEN` tag, if present, selects the starting position; otherwise the
    /// standard starting position is used.
    pub fn from_metadata(metadata: GameMetadata) -> Result<Game, GameError> {
        let position = match metadata.get("FEN") {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::standard_starting(),
        };
        Ok(Game {
            metadata,
            root: GameNode::new_root(position),
            next_id: Cell::new(NodeId::ROOT.value() + 1),
        })
    }

    /// Read-only access to the metadata.
    pub fn metadata(&self) -> &GameMetadata {
        &self.metadata
    }

    /// Mutable access to the metadata.
    pub fn metadata_mut(&mut self) -> &mut GameMetadata {
        &mut self.metadata
    }

    /// Sets a metadata tag, replacing the value of an existing tag with the
    /// same name.
    ///
    /// Note that this does not reinterpret special tags: changing `FEN` on
    /// an existing game leaves the root position untouched.
    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.metadata.set(name, value);
    }

    /// Returns a handle to the root node.
    pub fn root(&self) -> GameNode {
        self.root.clone()
    }

    /// Adds a node under `parent` for the given move.
    ///
    /// Allocation is monotone: every call consumes an id, even when the
    /// returned node is an existing child with the same move (see
    /// [`GameNode::append_child`]).
    pub fn add_node(&self, parent: &GameNode, mov: Move) -> GameNode {
        let id = NodeId(self.next_id.get());
        self.next_id.set(id.value() + 1);
        parent.append_child(GameNode::new_child(id, mov, parent))
    }

    /// Returns a read cursor at the root.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self, self.root())
    }

    /// Returns an edit cursor at the root.
    ///
    /// Requires exclusive access to the game; edit cursors derived from the
    /// returned one (via [`CursorMut::play_move`] and friends) keep the game
    /// borrowed for as long as any of them lives.
    pub fn edit(&mut self) -> CursorMut<'_> {
        CursorMut::new(self, self.root())
    }

    /// Returns an edit cursor at the end of the main line: the node reached
    /// from the root by following child 0 until a leaf.
    pub fn current_mainline(&mut self) -> CursorMut<'_> {
        let mut node = self.root();
        while let Some(next) = node.child(0) {
            node = next;
        }
        CursorMut::new(self, node)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}
