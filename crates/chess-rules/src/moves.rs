//! Fully-qualified move representation.

use std::fmt;

use shakmaty::{Color, File, Piece, Role, Square};

/// Check status of a position (or of the position a move leads to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    /// The side to move is not in check.
    #[default]
    None,
    /// The side to move is in check.
    Check,
    /// The side to move is checkmated.
    Checkmate,
}

/// A fully-qualified chess move.
///
/// Unlike a SAN token, a `Move` carries everything needed to replay it on a
/// board without further lookups: origin, destination, the moving piece and
/// any captured or promoted piece. Castling is stored king-centric: `from`
/// is the king's square and `to` the king's target (g1/c1 or g8/c8).
///
/// Equality is structural over all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// The moving piece.
    pub piece: Piece,
    /// The captured piece, if any. For en passant captures this is the
    /// opposing pawn even though it does not stand on `to`.
    pub captured: Option<Piece>,
    /// The piece a pawn promotes to, if any.
    pub promoted: Option<Piece>,
    /// True if this move captures en passant.
    pub capturing_en_passant: bool,
}

impl Move {
    /// Returns true if this is a castling move (the king travels two files).
    #[inline]
    pub fn is_castling(&self) -> bool {
        self.piece.role == Role::King && file_distance(self.from.file(), self.to.file()) > 1
    }

    /// Converts an engine move into the facade representation.
    ///
    /// `turn` is the side making the move.
    pub(crate) fn from_engine(engine_move: &shakmaty::Move, turn: Color) -> Move {
        match *engine_move {
            shakmaty::Move::Normal {
                role,
                from,
                capture,
                to,
                promotion,
            } => Move {
                from,
                to,
                piece: Piece { color: turn, role },
                captured: capture.map(|role| Piece { color: !turn, role }),
                promoted: promotion.map(|role| Piece { color: turn, role }),
                capturing_en_passant: false,
            },
            shakmaty::Move::EnPassant { from, to } => Move {
                from,
                to,
                piece: Piece {
                    color: turn,
                    role: Role::Pawn,
                },
                captured: Some(Piece {
                    color: !turn,
                    role: Role::Pawn,
                }),
                promoted: None,
                capturing_en_passant: true,
            },
            shakmaty::Move::Castle { king, rook } => {
                let target_file = if rook.file() > king.file() {
                    File::G
                } else {
                    File::C
                };
                Move {
                    from: king,
                    to: Square::from_coords(target_file, king.rank()),
                    piece: Piece {
                        color: turn,
                        role: Role::King,
                    },
                    captured: None,
                    promoted: None,
                    capturing_en_passant: false,
                }
            }
            // Put moves only exist in drop variants, which the facade does
            // not expose.
            shakmaty::Move::Put { role, to } => Move {
                from: to,
                to,
                piece: Piece { color: turn, role },
                captured: None,
                promoted: None,
                capturing_en_passant: false,
            },
        }
    }

    /// Converts back into the engine representation for move application.
    pub(crate) fn to_engine(self) -> shakmaty::Move {
        if self.is_castling() {
            let rook_file = if self.to.file() == File::G {
                File::H
            } else {
                File::A
            };
            shakmaty::Move::Castle {
                king: self.from,
                rook: Square::from_coords(rook_file, self.from.rank()),
            }
        } else if self.capturing_en_passant {
            shakmaty::Move::EnPassant {
                from: self.from,
                to: self.to,
            }
        } else {
            shakmaty::Move::Normal {
                role: self.piece.role,
                from: self.from,
                capture: self.captured.map(|piece| piece.role),
                to: self.to,
                promotion: self.promoted.map(|piece| piece.role),
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promoted) = self.promoted {
            write!(f, "={}", promoted.role.upper_char())?;
        }
        Ok(())
    }
}

fn file_distance(a: File, b: File) -> u32 {
    u32::from(a).abs_diff(u32::from(b))
}
