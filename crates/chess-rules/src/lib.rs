//! Rules-engine facade for the PGN game library.
//!
//! This crate provides the narrow contract the game-tree and SAN code
//! consumes from a chess rules engine:
//! - [`Position`] - board state with legal move generation and move application
//! - [`Move`] - a fully-qualified move (origin, destination, piece, capture,
//!   promotion, en passant)
//! - [`CheckState`] - whether a position is quiet, check or checkmate
//!
//! The engine behind the facade is `shakmaty`; its vocabulary types
//! ([`Color`], [`Role`], [`Piece`], [`Square`], [`File`], [`Rank`]) are
//! re-exported so downstream code never depends on `shakmaty` directly.
//! Only standard chess is supported; positions are created in standard
//! castling mode.

mod moves;
mod position;

pub use moves::{CheckState, Move};
pub use position::{Position, PositionError};

pub use shakmaty::{Color, File, Piece, Rank, Role, Square};
