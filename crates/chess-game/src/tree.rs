//! The move tree: nodes, identifiers and position reconstruction.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chess_rules::{Move, Position};

use crate::error::GameError;

/// Identifier of a node within one game.
///
/// Ids are allocated monotonically per game and are not global; the root is
/// always id 1 and id 0 is reserved as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The reserved invalid id.
    pub const INVALID: NodeId = NodeId(0);
    /// The id of every game's root node.
    pub(crate) const ROOT: NodeId = NodeId(1);

    /// Returns the numeric value of the id.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct NodeData {
    id: NodeId,
    /// The move that led from the parent to this node; `None` on the root.
    mov: Option<Move>,
    parent: Weak<RefCell<NodeData>>,
    /// Child 0 is the main-line continuation, the rest are variations in
    /// declaration order.
    children: Vec<GameNode>,
    comment: String,
    premove_comment: String,
    nags: Vec<u16>,
    /// Cached position; always present on the root, lazily filled elsewhere.
    position: Option<Position>,
}

/// A node of the move tree.
///
/// Each node represents the state reached by playing one half-move from its
/// parent; the root represents the starting position. The handle is cheap to
/// clone and shares the underlying node; nodes are owned by their parent's
/// child list (the root by the [`Game`](crate::Game)).
///
/// Equality between handles is identity: two handles are equal when they
/// refer to the same node.
#[derive(Clone)]
pub struct GameNode {
    data: Rc<RefCell<NodeData>>,
}

impl GameNode {
    /// Creates a game root holding the given starting position.
    pub(crate) fn new_root(position: Position) -> GameNode {
        GameNode {
            data: Rc::new(RefCell::new(NodeData {
                id: NodeId::ROOT,
                mov: None,
                parent: Weak::new(),
                children: Vec::new(),
                comment: String::new(),
                premove_comment: String::new(),
                nags: Vec::new(),
                position: Some(position),
            })),
        }
    }

    /// Creates a candidate child of `parent`. The candidate is not attached;
    /// attachment (with deduplication) happens in [`GameNode::append_child`].
    pub(crate) fn new_child(id: NodeId, mov: Move, parent: &GameNode) -> GameNode {
        GameNode {
            data: Rc::new(RefCell::new(NodeData {
                id,
                mov: Some(mov),
                parent: Rc::downgrade(&parent.data),
                children: Vec::new(),
                comment: String::new(),
                premove_comment: String::new(),
                nags: Vec::new(),
                position: None,
            })),
        }
    }

    /// Returns the id of the node.
    pub fn id(&self) -> NodeId {
        self.data.borrow().id
    }

    /// Returns the move that led to this node, or `None` for the root.
    pub fn mov(&self) -> Option<Move> {
        self.data.borrow().mov
    }

    /// Returns the parent node, or `None` for the root (or if the tree has
    /// been dropped).
    pub fn parent(&self) -> Option<GameNode> {
        self.data
            .borrow()
            .parent
            .upgrade()
            .map(|data| GameNode { data })
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.data.borrow().children.len()
    }

    /// Returns the child at `index`. Index 0 is the main line; out-of-range
    /// indices return `None`.
    pub fn child(&self, index: usize) -> Option<GameNode> {
        self.data.borrow().children.get(index).cloned()
    }

    /// Appends a child, deduplicating by move.
    ///
    /// If an existing child was reached by the same move, that child is
    /// returned and the candidate is dropped; otherwise the candidate is
    /// appended and returned. Callers therefore always receive the canonical
    /// node for the move.
    pub fn append_child(&self, candidate: GameNode) -> GameNode {
        let candidate_move = candidate.mov();
        let mut data = self.data.borrow_mut();
        if let Some(existing) = data
            .children
            .iter()
            .find(|child| child.mov() == candidate_move)
        {
            return existing.clone();
        }
        data.children.push(candidate.clone());
        candidate
    }

    /// Returns the index of `child` among this node's children, or `None` if
    /// it is not a child of this node.
    pub fn child_index(&self, child: &GameNode) -> Option<usize> {
        self.data
            .borrow()
            .children
            .iter()
            .position(|candidate| candidate == child)
    }

    /// Returns the post-move comment.
    pub fn comment(&self) -> String {
        self.data.borrow().comment.clone()
    }

    /// Replaces the post-move comment.
    pub fn set_comment(&self, comment: impl Into<String>) {
        self.data.borrow_mut().comment = comment.into();
    }

    /// Appends to the post-move comment.
    pub fn append_comment(&self, comment: &str) {
        self.data.borrow_mut().comment.push_str(comment);
    }

    /// Returns the comment placed before the move (used by variations).
    pub fn premove_comment(&self) -> String {
        self.data.borrow().premove_comment.clone()
    }

    /// Replaces the pre-move comment.
    pub fn set_premove_comment(&self, comment: impl Into<String>) {
        self.data.borrow_mut().premove_comment = comment.into();
    }

    /// Appends to the pre-move comment.
    pub fn append_premove_comment(&self, comment: &str) {
        self.data.borrow_mut().premove_comment.push_str(comment);
    }

    /// Returns the numeric annotation glyphs of the move, in order.
    pub fn nags(&self) -> Vec<u16> {
        self.data.borrow().nags.clone()
    }

    /// Appends a numeric annotation glyph.
    pub fn push_nag(&self, nag: u16) {
        self.data.borrow_mut().nags.push(nag);
    }

    /// Returns a clone of the cached position, if one is stored.
    pub fn cached_position(&self) -> Option<Position> {
        self.data.borrow().position.clone()
    }

    /// Stores a position on the node.
    pub fn set_position(&self, position: Position) {
        self.data.borrow_mut().position = Some(position);
    }

    /// Computes the position of this node.
    ///
    /// Walks parent links up to the nearest ancestor with a cached position
    /// (the root always has one), then replays the moves back down. The
    /// result is not stored; use [`GameNode::set_position`] for that.
    pub fn compute_position(&self) -> Result<Position, GameError> {
        if let Some(position) = self.cached_position() {
            return Ok(position);
        }

        let mut chain = vec![self.clone()];
        let mut position = loop {
            let last = chain.last().map(GameNode::clone);
            let parent = match last.and_then(|node| node.parent()) {
                Some(parent) => parent,
                None => return Err(GameError::OrphanNode),
            };
            match parent.cached_position() {
                Some(position) => break position,
                None => chain.push(parent),
            }
        };

        for node in chain.iter().rev() {
            let mov = node.mov().ok_or(GameError::OrphanNode)?;
            position.make_move(&mov)?;
        }
        Ok(position)
    }
}

impl PartialEq for GameNode {
    fn eq(&self, other: &GameNode) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for GameNode {}

impl fmt::Debug for GameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("GameNode")
            .field("id", &data.id)
            .field("mov", &data.mov)
            .field("children", &data.children.len())
            .finish()
    }
}
