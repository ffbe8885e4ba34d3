//! Board state with legal move generation.

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position as _};
use thiserror::Error;

use crate::moves::{CheckState, Move};

/// Error type for position construction and move application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The FEN string could not be parsed or describes an illegal setup.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    /// The move is not legal in the position it was applied to.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// A chess position.
///
/// Wraps the engine's board state and exposes the handful of operations the
/// game library needs: side to move, move counters, check status, the legal
/// move list and move application.
#[derive(Debug, Clone)]
pub struct Position {
    inner: Chess,
}

impl Position {
    /// Returns the standard starting position.
    pub fn standard_starting() -> Position {
        Position {
            inner: Chess::default(),
        }
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Position, PositionError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|err| PositionError::InvalidFen(format!("{err}: {fen}")))?;
        let inner = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|err| PositionError::InvalidFen(format!("{err}: {fen}")))?;
        Ok(Position { inner })
    }

    /// Renders the position as a FEN string.
    pub fn to_fen(&self) -> String {
        Fen::from_position(self.inner.clone(), EnPassantMode::Legal).to_string()
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.inner.turn()
    }

    /// Returns the current full-move number (starts at 1).
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.inner.fullmoves().get()
    }

    /// Returns whether the side to move is quiet, in check or checkmated.
    pub fn check_state(&self) -> CheckState {
        if self.inner.is_checkmate() {
            CheckState::Checkmate
        } else if self.inner.is_check() {
            CheckState::Check
        } else {
            CheckState::None
        }
    }

    /// Returns all legal moves in this position.
    pub fn legal_moves(&self) -> Vec<Move> {
        let turn = self.inner.turn();
        self.inner
            .legal_moves()
            .iter()
            .map(|engine_move| Move::from_engine(engine_move, turn))
            .collect()
    }

    /// Applies a move to the position.
    ///
    /// The move must be legal; otherwise the position is left untouched and
    /// an error is returned.
    pub fn make_move(&mut self, mv: &Move) -> Result<(), PositionError> {
        let engine_move = mv.to_engine();
        if !self.inner.is_legal(&engine_move) {
            return Err(PositionError::IllegalMove(mv.to_string()));
        }
        self.inner.play_unchecked(&engine_move);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Piece, Role, Square};

    #[test]
    fn starting_position() {
        let position = Position::standard_starting();
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.check_state(), CheckState::None);
        assert_eq!(position.legal_moves().len(), 20);
    }

    #[test]
    fn fen_round_trip() {
        let fen = "r4rk1/pp3ppp/2n1q3/8/8/P7/1P3PPP/R1BQ1RK1 w - - 0 1";
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn invalid_fen_rejected() {
        assert!(Position::from_fen("not a fen").is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn make_legal_move() {
        let mut position = Position::standard_starting();
        let mv = position
            .legal_moves()
            .into_iter()
            .find(|m| m.from == Square::E2 && m.to == Square::E4)
            .unwrap();
        position.make_move(&mv).unwrap();
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn make_illegal_move_rejected() {
        let mut position = Position::standard_starting();
        let illegal = Move {
            from: Square::E2,
            to: Square::E5,
            piece: Piece {
                color: Color::White,
                role: Role::Pawn,
            },
            captured: None,
            promoted: None,
            capturing_en_passant: false,
        };
        assert!(position.make_move(&illegal).is_err());
    }

    #[test]
    fn checkmate_detection() {
        // Fool's mate.
        let position =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(position.check_state(), CheckState::Checkmate);
    }

    #[test]
    fn check_detection() {
        let position =
            Position::from_fen("rnbqkbnr/ppp2ppp/8/1B1pp3/4P3/8/PPPP1PPP/RNBQK1NR b KQkq - 1 3")
                .unwrap();
        assert_eq!(position.check_state(), CheckState::Check);
    }

    #[test]
    fn castling_moves_in_legal_list() {
        let position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let legal = position.legal_moves();
        let kingside = legal
            .iter()
            .find(|m| m.is_castling() && m.to == Square::G1);
        let queenside = legal
            .iter()
            .find(|m| m.is_castling() && m.to == Square::C1);
        assert!(kingside.is_some());
        assert!(queenside.is_some());

        let mut position = position;
        position.make_move(kingside.unwrap()).unwrap();
        assert_eq!(position.side_to_move(), Color::Black);
    }

    #[test]
    fn en_passant_in_legal_list() {
        let position =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let legal = position.legal_moves();
        let ep = legal
            .iter()
            .find(|m| m.capturing_en_passant)
            .expect("en passant capture should be legal");
        assert_eq!(ep.from, Square::E5);
        assert_eq!(ep.to, Square::F6);
        assert_eq!(
            ep.captured,
            Some(Piece {
                color: Color::Black,
                role: Role::Pawn
            })
        );
    }
}
