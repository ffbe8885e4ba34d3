//! SAN string parsing.
//!
//! Scans a single SAN token left to right. The tricky part is that a leading
//! file-rank pair (`e4` in `e4`, `d1` in `Rd1d2`, `e6` in `e6xd5`) can be
//! either the target square or origin disambiguation; which one it is only
//! becomes clear from the character that follows.

use chess_rules::{CheckState, Color, File, Piece, Rank, Role, Square};

use crate::san::{SanError, SanErrorKind, SanMove, SuffixAnnotation};

const SHORT_CASTLING: &str = "O-O";
const LONG_CASTLING: &str = "O-O-O";

/// Classification of the next character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Piece(Role),
    FileChar(File),
    RankChar(Rank),
    Capture,
    Check,
    Checkmate,
    Promotion,
    Suffix,
    End,
    Invalid,
}

fn classify(rest: &str) -> Scan {
    let Some(&byte) = rest.as_bytes().first() else {
        return Scan::End;
    };
    match byte {
        b'P' => Scan::Piece(Role::Pawn),
        b'N' => Scan::Piece(Role::Knight),
        b'B' => Scan::Piece(Role::Bishop),
        b'R' => Scan::Piece(Role::Rook),
        b'Q' => Scan::Piece(Role::Queen),
        b'K' => Scan::Piece(Role::King),
        b'a'..=b'h' => match File::from_char(byte as char) {
            Some(file) => Scan::FileChar(file),
            None => Scan::Invalid,
        },
        b'1'..=b'8' => match Rank::from_char(byte as char) {
            Some(rank) => Scan::RankChar(rank),
            None => Scan::Invalid,
        },
        b'x' => Scan::Capture,
        b'+' => Scan::Check,
        b'#' => Scan::Checkmate,
        b'=' => Scan::Promotion,
        b'!' | b'?' => Scan::Suffix,
        _ => Scan::Invalid,
    }
}

struct Parser<'s> {
    san: &'s str,
    rest: &'s str,
    side_to_move: Color,
    mov: SanMove,
    /// A file-rank pair already consumed that may still turn out to be
    /// origin disambiguation rather than the target square.
    tentative: Option<(File, Rank)>,
}

impl<'s> Parser<'s> {
    fn new(san: &'s str, side_to_move: Color) -> Parser<'s> {
        Parser {
            san,
            rest: san,
            side_to_move,
            mov: SanMove {
                original: san.to_string(),
                piece: Piece {
                    color: side_to_move,
                    role: Role::Pawn,
                },
                target: Square::A1,
                capturing: false,
                promotion: None,
                check_state: CheckState::None,
                disambiguation_file: None,
                disambiguation_rank: None,
                suffix_annotation: None,
            },
            tentative: None,
        }
    }

    fn error(&self, kind: SanErrorKind) -> SanError {
        SanError::new(kind, self.san)
    }

    fn advance(&mut self, count: usize) {
        self.rest = &self.rest[count..];
    }

    /// Commits the tentative file-rank pair as origin disambiguation.
    fn commit_tentative_as_disambiguation(&mut self) {
        if let Some((file, rank)) = self.tentative.take() {
            self.mov.disambiguation_file = Some(file);
            self.mov.disambiguation_rank = Some(rank);
        }
    }

    fn parse_piece_type(&mut self) {
        if let Scan::Piece(role) = classify(self.rest) {
            self.mov.piece = Piece {
                color: self.side_to_move,
                role,
            };
            self.advance(1);
        }
    }

    fn parse_disambiguation(&mut self) {
        match classify(self.rest) {
            Scan::FileChar(file) => {
                if let Scan::RankChar(rank) = classify(&self.rest[1..]) {
                    self.tentative = Some((file, rank));
                    self.advance(2);
                } else {
                    self.mov.disambiguation_file = Some(file);
                    self.advance(1);
                }
            }
            Scan::RankChar(rank) => {
                self.mov.disambiguation_rank = Some(rank);
                self.advance(1);
            }
            _ => {}
        }
    }

    fn parse_capture(&mut self) {
        if classify(self.rest) == Scan::Capture {
            self.mov.capturing = true;
            self.advance(1);
            self.commit_tentative_as_disambiguation();
        }
    }

    fn parse_target_square(&mut self) -> Result<(), SanError> {
        match classify(self.rest) {
            Scan::FileChar(file) => {
                let Scan::RankChar(rank) = classify(&self.rest[1..]) else {
                    return Err(self.error(SanErrorKind::MissingRank));
                };
                self.commit_tentative_as_disambiguation();
                self.mov.target = Square::from_coords(file, rank);
                self.advance(2);
                Ok(())
            }
            _ => match self.tentative.take() {
                Some((file, rank)) => {
                    self.mov.target = Square::from_coords(file, rank);
                    Ok(())
                }
                None => Err(self.error(SanErrorKind::MissingFile)),
            },
        }
    }

    fn parse_promotion(&mut self) -> Result<(), SanError> {
        if classify(self.rest) == Scan::Promotion {
            self.advance(1);
            let Scan::Piece(role) = classify(self.rest) else {
                return Err(self.error(SanErrorKind::MissingPieceType));
            };
            self.mov.promotion = Some(Piece {
                color: self.side_to_move,
                role,
            });
            self.advance(1);
        }
        Ok(())
    }

    fn parse_suffixes(&mut self) -> Result<(), SanError> {
        if classify(self.rest) == Scan::Check {
            self.mov.check_state = CheckState::Check;
            self.advance(1);
        }
        if classify(self.rest) == Scan::Checkmate {
            if self.mov.check_state != CheckState::None {
                return Err(self.error(SanErrorKind::CheckAndCheckmate));
            }
            self.mov.check_state = CheckState::Checkmate;
            self.advance(1);
        }
        if classify(self.rest) == Scan::Check {
            // A second indicator after `#` (or `+`).
            return Err(self.error(SanErrorKind::CheckAndCheckmate));
        }
        if classify(self.rest) == Scan::Suffix {
            let token: String = self.rest.chars().take(2).collect();
            match SuffixAnnotation::from_token(&token) {
                Some(annotation) => self.mov.suffix_annotation = Some(annotation),
                None => return Err(self.error(SanErrorKind::InvalidSuffixAnnotation)),
            }
            self.advance(token.len());
        }
        Ok(())
    }

    fn finish(self) -> Result<SanMove, SanError> {
        if !self.rest.is_empty() {
            return Err(self.error(SanErrorKind::UnexpectedCharsAtEnd));
        }
        Ok(self.mov)
    }

    fn parse_castling(mut self) -> Result<SanMove, SanError> {
        self.mov.piece = Piece {
            color: self.side_to_move,
            role: Role::King,
        };
        self.mov.target = if self.rest.starts_with(LONG_CASTLING) {
            self.advance(LONG_CASTLING.len());
            match self.side_to_move {
                Color::White => Square::C1,
                Color::Black => Square::C8,
            }
        } else {
            self.advance(SHORT_CASTLING.len());
            match self.side_to_move {
                Color::White => Square::G1,
                Color::Black => Square::G8,
            }
        };
        self.parse_suffixes()?;
        self.finish()
    }
}

/// Parses a SAN string into a [`SanMove`].
///
/// `side_to_move` colors the moving and promoted pieces and decides the
/// castling target squares.
pub fn parse_san(san: &str, side_to_move: Color) -> Result<SanMove, SanError> {
    let mut parser = Parser::new(san, side_to_move);
    if san.starts_with(SHORT_CASTLING) {
        return parser.parse_castling();
    }

    if matches!(classify(parser.rest), Scan::Invalid | Scan::End) {
        return Err(parser.error(SanErrorKind::UnexpectedToken));
    }

    parser.parse_piece_type();
    parser.parse_disambiguation();
    parser.parse_capture();
    parser.parse_target_square()?;
    parser.parse_promotion()?;
    parser.parse_suffixes()?;
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(color: Color, role: Role) -> Piece {
        Piece { color, role }
    }

    fn parsed(san: &str, color: Color) -> SanMove {
        parse_san(san, color).expect(san)
    }

    fn error_kind(san: &str, color: Color) -> SanErrorKind {
        parse_san(san, color).expect_err(san).kind
    }

    #[test]
    fn castling() {
        let short_white = parsed("O-O", Color::White);
        assert_eq!(short_white.piece, piece(Color::White, Role::King));
        assert_eq!(short_white.target, Square::G1);
        assert!(!short_white.capturing);

        let short_black = parsed("O-O", Color::Black);
        assert_eq!(short_black.target, Square::G8);

        let long_white = parsed("O-O-O", Color::White);
        assert_eq!(long_white.target, Square::C1);

        let long_black = parsed("O-O-O", Color::Black);
        assert_eq!(long_black.piece, piece(Color::Black, Role::King));
        assert_eq!(long_black.target, Square::C8);
    }

    #[test]
    fn plain_piece_moves() {
        let cases = [
            ("e4", Color::White, Role::Pawn, Square::E4),
            ("c6", Color::Black, Role::Pawn, Square::C6),
            ("Nf3", Color::White, Role::Knight, Square::F3),
            ("Rc1", Color::Black, Role::Rook, Square::C1),
            ("Ba3", Color::White, Role::Bishop, Square::A3),
            ("Qd4", Color::Black, Role::Queen, Square::D4),
            ("Kg8", Color::White, Role::King, Square::G8),
        ];
        for (san, color, role, target) in cases {
            let mov = parsed(san, color);
            assert_eq!(mov.piece, piece(color, role), "{san}");
            assert_eq!(mov.target, target, "{san}");
            assert!(!mov.capturing, "{san}");
            assert_eq!(mov.check_state, CheckState::None, "{san}");
            assert_eq!(mov.disambiguation_file, None, "{san}");
            assert_eq!(mov.disambiguation_rank, None, "{san}");
        }
    }

    #[test]
    fn captures() {
        let mov = parsed("Bxe5", Color::White);
        assert_eq!(mov.piece, piece(Color::White, Role::Bishop));
        assert_eq!(mov.target, Square::E5);
        assert!(mov.capturing);

        let mov = parsed("Qxd4", Color::Black);
        assert_eq!(mov.piece, piece(Color::Black, Role::Queen));
        assert!(mov.capturing);
    }

    #[test]
    fn disambiguation() {
        let mov = parsed("Ncd4", Color::White);
        assert_eq!(mov.disambiguation_file, Some(File::C));
        assert_eq!(mov.disambiguation_rank, None);
        assert_eq!(mov.target, Square::D4);

        let mov = parsed("N3d4", Color::White);
        assert_eq!(mov.disambiguation_file, None);
        assert_eq!(mov.disambiguation_rank, Some(Rank::Third));

        let mov = parsed("dxe5", Color::White);
        assert_eq!(mov.piece, piece(Color::White, Role::Pawn));
        assert_eq!(mov.disambiguation_file, Some(File::D));
        assert!(mov.capturing);

        let mov = parsed("R5xe2", Color::Black);
        assert_eq!(mov.disambiguation_rank, Some(Rank::Fifth));
        assert!(mov.capturing);

        // Full square disambiguation, before and without a capture marker.
        let mov = parsed("Qa6xb7#", Color::White);
        assert_eq!(mov.disambiguation_file, Some(File::A));
        assert_eq!(mov.disambiguation_rank, Some(Rank::Sixth));
        assert_eq!(mov.target, Square::B7);
        assert!(mov.capturing);
        assert_eq!(mov.check_state, CheckState::Checkmate);

        let mov = parsed("Rd1d2", Color::White);
        assert_eq!(mov.disambiguation_file, Some(File::D));
        assert_eq!(mov.disambiguation_rank, Some(Rank::First));
        assert_eq!(mov.target, Square::D2);

        // Pawn capture written with a full origin square.
        let mov = parsed("e6xd5", Color::Black);
        assert_eq!(mov.piece, piece(Color::Black, Role::Pawn));
        assert_eq!(mov.disambiguation_file, Some(File::E));
        assert_eq!(mov.disambiguation_rank, Some(Rank::Sixth));
        assert_eq!(mov.target, Square::D5);
    }

    #[test]
    fn check_and_checkmate() {
        let mov = parsed("d7+", Color::White);
        assert_eq!(mov.piece, piece(Color::White, Role::Pawn));
        assert_eq!(mov.check_state, CheckState::Check);

        let mov = parsed("dxe3#", Color::Black);
        assert!(mov.capturing);
        assert_eq!(mov.check_state, CheckState::Checkmate);

        let mov = parsed("Qe3+", Color::White);
        assert_eq!(mov.check_state, CheckState::Check);

        let mov = parsed("Qxe3#", Color::Black);
        assert_eq!(mov.check_state, CheckState::Checkmate);
    }

    #[test]
    fn promotion() {
        let mov = parsed("exd8=Q#", Color::White);
        assert_eq!(mov.piece, piece(Color::White, Role::Pawn));
        assert_eq!(mov.target, Square::D8);
        assert!(mov.capturing);
        assert_eq!(mov.promotion, Some(piece(Color::White, Role::Queen)));
        assert_eq!(mov.check_state, CheckState::Checkmate);

        let mov = parsed("c1=Q", Color::Black);
        assert_eq!(mov.promotion, Some(piece(Color::Black, Role::Queen)));
        assert_eq!(mov.target, Square::C1);
    }

    #[test]
    fn suffix_annotations() {
        let cases = [
            ("Qxe2!", Color::White, SuffixAnnotation::Good),
            ("Bec3!?", Color::Black, SuffixAnnotation::Speculative),
            ("O-O??", Color::White, SuffixAnnotation::VeryPoor),
            ("O-O-O?", Color::Black, SuffixAnnotation::Poor),
            ("exd8=Q+!!", Color::White, SuffixAnnotation::VeryGood),
            ("dxe2?!", Color::Black, SuffixAnnotation::Questionable),
        ];
        for (san, color, suffix) in cases {
            assert_eq!(parsed(san, color).suffix_annotation, Some(suffix), "{san}");
        }
        assert_eq!(
            parsed("exd8=Q+!!", Color::White).check_state,
            CheckState::Check
        );
    }

    #[test]
    fn invalid_san() {
        assert_eq!(
            error_kind("axf9", Color::White),
            SanErrorKind::MissingRank
        );
        assert_eq!(
            error_kind("Lc4", Color::Black),
            SanErrorKind::UnexpectedToken
        );
        assert_eq!(error_kind("", Color::White), SanErrorKind::UnexpectedToken);
        assert_eq!(
            error_kind("Kg1a", Color::White),
            SanErrorKind::MissingRank
        );
        assert_eq!(
            error_kind("O-O+#", Color::White),
            SanErrorKind::CheckAndCheckmate
        );
        assert_eq!(
            error_kind("Qxd4#+", Color::Black),
            SanErrorKind::CheckAndCheckmate
        );
        assert_eq!(
            error_kind("e4!x", Color::White),
            SanErrorKind::InvalidSuffixAnnotation
        );
        assert_eq!(
            error_kind("Nf3N", Color::White),
            SanErrorKind::UnexpectedCharsAtEnd
        );
        assert_eq!(
            error_kind("e8=", Color::White),
            SanErrorKind::MissingPieceType
        );
        assert_eq!(
            error_kind("O-Ox", Color::White),
            SanErrorKind::UnexpectedCharsAtEnd
        );
    }

    #[test]
    fn original_string_is_kept() {
        assert_eq!(parsed("Nbxd5+", Color::White).original, "Nbxd5+");
    }
}
