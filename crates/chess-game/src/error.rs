//! Error and warning types for game trees and PGN processing.

use std::fmt;

use chess_rules::PositionError;
use thiserror::Error;

/// Error type for game-tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The operation requires a parent node, but the node is the root.
    #[error("node has no parent")]
    NoParent,
    /// No ancestor with a cached position was found when reconstructing a
    /// node's position.
    #[error("no ancestor with position information found")]
    OrphanNode,
    /// An error propagated from the rules engine.
    #[error(transparent)]
    Rules(#[from] PositionError),
}

/// The kind of a PGN parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgnErrorKind {
    /// The underlying input stream failed.
    InputError,
    /// A byte that cannot start any token.
    UnexpectedChar,
    /// The input ended in the middle of a game.
    EndOfInput,
    /// A token that the grammar does not allow at this point.
    UnexpectedToken,
    /// A token that looks like a game result but is not one of
    /// `1-0`, `0-1`, `1/2-1/2` or `*`.
    InvalidGameResult,
    /// A move token that is not syntactically valid SAN.
    InvalidMove,
    /// A syntactically valid SAN move with no legal interpretation.
    IllegalMove,
    /// A SAN move matching more than one legal move.
    AmbiguousMove,
    /// A variation opened at the root, where there is no move to vary.
    CannotStartRav,
    /// A variation closed while none was open.
    NoPendingRav,
    /// An error propagated from the game or the rules engine.
    ChessGame,
}

impl fmt::Display for PgnErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PgnErrorKind::InputError => "input error",
            PgnErrorKind::UnexpectedChar => "unexpected character",
            PgnErrorKind::EndOfInput => "unexpected end of input",
            PgnErrorKind::UnexpectedToken => "unexpected token",
            PgnErrorKind::InvalidGameResult => "invalid game result",
            PgnErrorKind::InvalidMove => "invalid move",
            PgnErrorKind::IllegalMove => "illegal move",
            PgnErrorKind::AmbiguousMove => "ambiguous move",
            PgnErrorKind::CannotStartRav => "cannot start variation here",
            PgnErrorKind::NoPendingRav => "no open variation",
            PgnErrorKind::ChessGame => "chess game error",
        };
        f.write_str(text)
    }
}

/// An error encountered while reading PGN data.
///
/// Fatal to the current game; the caller can resynchronize with
/// [`PgnParser::skip_to_next_game`](crate::PgnParser::skip_to_next_game)
/// and keep reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnError {
    /// What went wrong.
    pub kind: PgnErrorKind,
    /// 1-based input line on which the error was detected.
    pub line: u32,
    /// Free-form context, e.g. the offending token.
    pub message: Option<String>,
}

impl PgnError {
    pub(crate) fn new(kind: PgnErrorKind, line: u32) -> PgnError {
        PgnError {
            kind,
            line,
            message: None,
        }
    }

    pub(crate) fn with_message(
        kind: PgnErrorKind,
        line: u32,
        message: impl Into<String>,
    ) -> PgnError {
        PgnError {
            kind,
            line,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PgnError {}

/// The kind of a recoverable PGN deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A stray byte inside movetext that was skipped.
    UnexpectedChar,
    /// A move resolved only after assuming it captures.
    MoveMissingCapture,
    /// A move resolved only after ignoring its piece letter.
    MoveMissingPieceType,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WarningKind::UnexpectedChar => "unexpected character",
            WarningKind::MoveMissingCapture => "move is missing its capture indicator",
            WarningKind::MoveMissingPieceType => "move is missing its piece letter",
        };
        f.write_str(text)
    }
}

/// A recoverable deviation found while parsing.
///
/// Warnings never abort parsing; they accumulate on the parser and can be
/// inspected after each game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// What was tolerated.
    pub kind: WarningKind,
    /// 1-based input line of the deviation.
    pub line: u32,
    /// The offending text.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

/// Error type for PGN output.
#[derive(Debug, Error)]
pub enum PgnWriteError {
    /// The output stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A tree node could not be rendered (position reconstruction failed).
    #[error(transparent)]
    Game(#[from] GameError),
    /// A stored move is not legal in its parent position.
    #[error("move {0} is not legal in its position")]
    UnwritableMove(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pgn_error_display() {
        let error = PgnError::with_message(PgnErrorKind::IllegalMove, 12, "Qd4");
        assert_eq!(error.to_string(), "line 12: illegal move: Qd4");

        let error = PgnError::new(PgnErrorKind::EndOfInput, 3);
        assert_eq!(error.to_string(), "line 3: unexpected end of input");
    }

    #[test]
    fn warning_display() {
        let warning = Warning {
            kind: WarningKind::MoveMissingCapture,
            line: 7,
            message: "e4".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "line 7: move is missing its capture indicator: e4"
        );
    }
}
