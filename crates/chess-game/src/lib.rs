//! Chess games as annotated move trees, with PGN input and output.
//!
//! This crate provides:
//! - [`Game`] - a single game: metadata plus a tree of moves where child 0 of
//!   every node is the main continuation and further children are variations
//! - [`Cursor`] / [`CursorMut`] - navigation and editing handles into a game
//! - [`SanMove`] with [`parse_san`] and [`generate_san`] - both directions of
//!   Standard Algebraic Notation, resolved against legal-move lists
//! - [`PgnParser`] / [`PgnWriter`] - a forgiving PGN reader that collects
//!   recoverable [`Warning`]s, and a writer producing standard 79-column
//!   output with the Seven Tag Roster first
//!
//! Board representation and move legality come from the `chess-rules` crate;
//! everything here works in terms of its [`Position`](chess_rules::Position)
//! and [`Move`](chess_rules::Move) types.
//!
//! # Example
//!
//! ```
//! use chess_game::PgnParser;
//!
//! let pgn = "[Event \"?\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 1-0";
//! let mut parser = PgnParser::new(pgn.as_bytes());
//! let game = parser.read_game().unwrap().unwrap();
//! let cursor = game.cursor();
//! assert_eq!(cursor.child_count(), 1);
//! assert_eq!(game.metadata().get("Result"), Some("1-0"));
//! ```

mod cursor;
mod error;
mod game;
mod metadata;
mod pgn;
mod san;
mod tree;

pub use cursor::{Cursor, CursorMut};
pub use error::{GameError, PgnError, PgnErrorKind, PgnWriteError, Warning, WarningKind};
pub use game::Game;
pub use metadata::{GameMetadata, Tag};
pub use pgn::lexer::{PgnLexer, Token, TokenKind};
pub use pgn::parser::PgnParser;
pub use pgn::writer::PgnWriter;
pub use pgn::{read_games, write_game, write_games};
pub use san::parser::parse_san;
pub use san::matcher::{generate_san, match_list, match_list_any_piece, matches};
pub use san::{SanError, SanErrorKind, SanMove, SuffixAnnotation};
pub use tree::{GameNode, NodeId};
