//! The PGN parser: token stream in, games out.
//!
//! The parser is forgiving where the PGN world is messy: move tokens missing
//! a piece letter or a capture `x` are resolved against the legal-move list
//! and recorded as [`Warning`]s, stray `,`/`}` bytes are skipped, and games
//! declaring the `chess960` variant are skipped entirely. Everything else is
//! an error that ends the current game; [`PgnParser::skip_to_next_game`]
//! resynchronizes on the next `[` so the following game can still be read.

use std::io::Read;
use std::mem;

use chess_rules::Move;
use log::{debug, warn};

use crate::cursor::CursorMut;
use crate::error::{PgnError, PgnErrorKind, Warning, WarningKind};
use crate::game::Game;
use crate::metadata::GameMetadata;
use crate::pgn::lexer::{PgnLexer, Token, TokenKind};
use crate::san::matcher::{match_list, match_list_any_piece};
use crate::san::parser::parse_san;
use crate::san::SanMove;

/// Bookkeeping for one open variation.
#[derive(Debug, Default)]
struct RavFrame {
    /// True once the variation's first move has been played.
    has_moves: bool,
    /// Comment text seen before the first move, to be attached to it.
    premove_comment: String,
}

/// A parser for streams of one or more PGN games.
pub struct PgnParser<R: Read> {
    lexer: PgnLexer<R>,
    /// One-token lookahead.
    token: Token,
    metadata: GameMetadata,
    warnings: Vec<Warning>,
}

impl<R: Read> PgnParser<R> {
    /// Creates a parser reading PGN data from `input`.
    pub fn new(input: R) -> PgnParser<R> {
        PgnParser {
            lexer: PgnLexer::new(input),
            token: Token {
                kind: TokenKind::EndOfInput,
                line: 1,
                value: String::new(),
            },
            metadata: GameMetadata::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns the warnings collected while reading the last game.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Reads the next game from the stream.
    ///
    /// Returns `Ok(None)` at clean end of input. On an error the stream is
    /// left mid-game; call [`PgnParser::skip_to_next_game`] before reading
    /// further games.
    pub fn read_game(&mut self) -> Result<Option<Game>, PgnError> {
        loop {
            self.reset();
            self.next_token()?;
            if self.token.kind == TokenKind::EndOfInput {
                return Ok(None);
            }

            self.read_tags()?;

            if self
                .metadata
                .get("Variant")
                .is_some_and(|variant| variant.eq_ignore_ascii_case("chess960"))
            {
                self.skip_to_next_game()?;
                continue;
            }

            let overall_comment = if self.token.kind == TokenKind::Comment {
                let text = mem::take(&mut self.token.value);
                self.next_token()?;
                Some(text)
            } else {
                None
            };

            let mut game = Game::from_metadata(self.metadata.clone()).map_err(|error| {
                PgnError::with_message(PgnErrorKind::ChessGame, self.token.line, error.to_string())
            })?;
            if let Some(comment) = overall_comment {
                game.root().set_comment(comment);
            }

            self.read_movetext(&mut game)?;
            debug!(
                "read game with {} tags and {} warnings",
                game.metadata().len(),
                self.warnings.len()
            );
            return Ok(Some(game));
        }
    }

    /// Skips forward to the start of the next game.
    ///
    /// Reads tokens until end of input or an opening bracket; the bracket
    /// byte is pushed back into the lexer so the next [`PgnParser::read_game`]
    /// sees it.
    pub fn skip_to_next_game(&mut self) -> Result<(), PgnError> {
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::EndOfInput => return Ok(()),
                TokenKind::OpenBracket => {
                    self.lexer.push_back(b'[');
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    fn reset(&mut self) {
        self.metadata = GameMetadata::new();
        self.warnings.clear();
    }

    fn next_token(&mut self) -> Result<(), PgnError> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected_token(&self) -> PgnError {
        let text = if self.token.value.is_empty() {
            format!("{:?}", self.token.kind)
        } else {
            self.token.value.clone()
        };
        PgnError::with_message(PgnErrorKind::UnexpectedToken, self.token.line, text)
    }

    fn record_warning(&mut self, kind: WarningKind, line: u32, message: impl Into<String>) {
        let warning = Warning {
            kind,
            line,
            message: message.into(),
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Reads the tag section: one or more `[ Symbol String ]` groups.
    fn read_tags(&mut self) -> Result<(), PgnError> {
        if self.token.kind != TokenKind::OpenBracket {
            return Err(self.unexpected_token());
        }
        while self.token.kind == TokenKind::OpenBracket {
            self.next_token()?;
            if self.token.kind != TokenKind::Symbol {
                return Err(self.unexpected_token());
            }
            let name = mem::take(&mut self.token.value);
            self.next_token()?;
            if self.token.kind != TokenKind::String {
                return Err(self.unexpected_token());
            }
            let value = mem::take(&mut self.token.value);
            self.next_token()?;
            if self.token.kind != TokenKind::CloseBracket {
                return Err(self.unexpected_token());
            }
            self.metadata.add(name, value);
            self.next_token()?;
        }
        Ok(())
    }

    /// Reads movetext up to and including the game result token.
    ///
    /// The state is a stack of edit cursors (the top tracks the current
    /// line's position) and a parallel stack of open-variation frames.
    fn read_movetext(&mut self, game: &mut Game) -> Result<(), PgnError> {
        let mut cursors = vec![game.edit()];
        let mut ravs: Vec<RavFrame> = Vec::new();

        loop {
            match self.token.kind {
                TokenKind::Symbol => {
                    let cursor = current(&cursors).clone();
                    let next = self.play_symbol(&cursor, ravs.last_mut())?;
                    *cursors.last_mut().expect("cursor stack is never empty") = next;
                }
                TokenKind::Nag => {
                    let line = self.token.line;
                    let nag = self.token.value.parse::<u16>().map_err(|_| {
                        PgnError::with_message(
                            PgnErrorKind::UnexpectedToken,
                            line,
                            format!("${}", self.token.value),
                        )
                    })?;
                    current(&cursors).push_nag(nag);
                }
                TokenKind::Comment => {
                    let text = mem::take(&mut self.token.value);
                    match ravs.last_mut() {
                        Some(frame) if !frame.has_moves => {
                            frame.premove_comment.push_str(&text);
                        }
                        _ => current(&cursors).append_comment(&text),
                    }
                }
                TokenKind::Number => {
                    // A move-number indication: the number and any run of
                    // dots are informational.
                    self.next_token()?;
                    while self.token.kind == TokenKind::Dot {
                        self.next_token()?;
                    }
                    continue;
                }
                TokenKind::Dot => {}
                TokenKind::OpenParen => {
                    let parent = current(&cursors)
                        .parent_mut()
                        .ok_or_else(|| {
                            PgnError::new(PgnErrorKind::CannotStartRav, self.token.line)
                        })?;
                    cursors.push(parent);
                    ravs.push(RavFrame::default());
                }
                TokenKind::CloseParen => {
                    if ravs.pop().is_none() {
                        return Err(PgnError::new(
                            PgnErrorKind::NoPendingRav,
                            self.token.line,
                        ));
                    }
                    cursors.pop();
                }
                TokenKind::GameResult => return Ok(()),
                TokenKind::Invalid => {
                    let line = self.token.line;
                    let value = mem::take(&mut self.token.value);
                    if value == "," || value == "}" {
                        self.record_warning(WarningKind::UnexpectedChar, line, value);
                    } else if looks_like_game_result(&value) {
                        return Err(PgnError::with_message(
                            PgnErrorKind::InvalidGameResult,
                            line,
                            value,
                        ));
                    } else {
                        return Err(PgnError::with_message(
                            PgnErrorKind::UnexpectedToken,
                            line,
                            value,
                        ));
                    }
                }
                TokenKind::EndOfInput => {
                    return Err(PgnError::with_message(
                        PgnErrorKind::EndOfInput,
                        self.token.line,
                        "movetext without game result",
                    ));
                }
                TokenKind::OpenBracket | TokenKind::CloseBracket | TokenKind::String => {
                    return Err(self.unexpected_token());
                }
            }
            self.next_token()?;
        }
    }

    /// Resolves one move token and advances the cursor past it.
    fn play_symbol<'g>(
        &mut self,
        cursor: &CursorMut<'g>,
        rav: Option<&mut RavFrame>,
    ) -> Result<CursorMut<'g>, PgnError> {
        let line = self.token.line;
        let text = self.token.value.clone();

        let san = parse_san(&text, cursor.side_to_move()).map_err(|error| {
            PgnError::with_message(PgnErrorKind::InvalidMove, line, error.to_string())
        })?;
        let position = cursor.position().map_err(|error| {
            PgnError::with_message(PgnErrorKind::ChessGame, line, error.to_string())
        })?;
        let legal_moves = position.legal_moves();
        let resolved = self.resolve_move(&san, &legal_moves, line, &text)?;

        let next = cursor.play_move(resolved);
        if let Some(suffix) = san.suffix_annotation {
            next.push_nag(suffix.nag());
        }
        if let Some(frame) = rav {
            frame.has_moves = true;
            if !frame.premove_comment.is_empty() {
                next.set_premove_comment(mem::take(&mut frame.premove_comment));
            }
        }
        Ok(next)
    }

    /// Matches a parsed SAN move against the legal moves, falling back to
    /// the two tolerated forgiving interpretations.
    fn resolve_move(
        &mut self,
        san: &SanMove,
        legal_moves: &[Move],
        line: u32,
        text: &str,
    ) -> Result<Move, PgnError> {
        let matched = match_list(san, legal_moves);
        match matched.len() {
            1 => Ok(matched[0]),
            0 => {
                let wildcard = match_list_any_piece(san, legal_moves);
                if wildcard.len() == 1 {
                    self.record_warning(WarningKind::MoveMissingPieceType, line, text);
                    return Ok(wildcard[0]);
                }
                let mut capturing = san.clone();
                capturing.capturing = true;
                let rematched = match_list(&capturing, legal_moves);
                if rematched.len() == 1 {
                    self.record_warning(WarningKind::MoveMissingCapture, line, text);
                    return Ok(rematched[0]);
                }
                Err(PgnError::with_message(
                    PgnErrorKind::IllegalMove,
                    line,
                    text,
                ))
            }
            _ => Err(PgnError::with_message(
                PgnErrorKind::AmbiguousMove,
                line,
                text,
            )),
        }
    }
}

fn current<'c, 'g>(cursors: &'c [CursorMut<'g>]) -> &'c CursorMut<'g> {
    cursors.last().expect("cursor stack is never empty")
}

/// A digit-led token with result separators: a malformed game result such as
/// `2-3` or `1/2`.
fn looks_like_game_result(value: &str) -> bool {
    value.as_bytes().first().is_some_and(u8::is_ascii_digit)
        && (value.contains('-') || value.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(input: &str) -> PgnParser<&[u8]> {
        PgnParser::new(input.as_bytes())
    }

    #[test]
    fn empty_input_is_no_game() {
        assert!(parser("").read_game().unwrap().is_none());
        assert!(parser("  \n\n ").read_game().unwrap().is_none());
    }

    #[test]
    fn game_must_start_with_a_tag() {
        let error = parser("1. e4 1-0").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::UnexpectedToken);
    }

    #[test]
    fn malformed_tag_section() {
        let error = parser("[Event]").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::UnexpectedToken);

        let error = parser("[Event \"x\"").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::UnexpectedToken);
    }

    #[test]
    fn movetext_without_result_fails() {
        let error = parser("[Event \"x\"]\n\n1. e4 e5").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::EndOfInput);
    }

    #[test]
    fn malformed_result_token() {
        let error = parser("[Event \"x\"]\n\n1. e4 e5 2-3").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::InvalidGameResult);
    }

    #[test]
    fn unbalanced_close_paren() {
        let error = parser("[Event \"x\"]\n\n1. e4 ) 1-0").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::NoPendingRav);
    }

    #[test]
    fn rav_at_root_fails() {
        let error = parser("[Event \"x\"]\n\n( 1. e4 ) *").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::CannotStartRav);
    }

    #[test]
    fn illegal_and_ambiguous_moves() {
        // No legal move reaches h5 from the starting position.
        let error = parser("[Event \"x\"]\n\n1. Qh5 1-0").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::IllegalMove);

        // Two rooks on the first rank can both reach d1.
        let pgn = "[FEN \"4k3/8/8/8/8/8/8/R3K2R w - - 0 1\"]\n\n1. Rd1 *";
        let error = parser(pgn).read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::AmbiguousMove);
    }

    #[test]
    fn unparsable_san_is_invalid_move() {
        let error = parser("[Event \"x\"]\n\n1. Lc4 1-0").read_game().unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::InvalidMove);
    }

    #[test]
    fn bad_fen_tag_is_a_chess_game_error() {
        let error = parser("[FEN \"garbage\"]\n\n1. e4 1-0")
            .read_game()
            .unwrap_err();
        assert_eq!(error.kind, PgnErrorKind::ChessGame);
    }

    #[test]
    fn commas_are_warnings_not_errors() {
        let mut parser = parser("[Event \"x\"]\n\n1. e4, e5 1-0");
        let game = parser.read_game().unwrap().unwrap();
        assert_eq!(parser.warnings().len(), 1);
        assert_eq!(parser.warnings()[0].kind, WarningKind::UnexpectedChar);
        assert_eq!(game.cursor().child(0).unwrap().child_count(), 1);
    }

    #[test]
    fn chess960_games_are_skipped() {
        let pgn = "[Variant \"Chess960\"]\n\n1. e4 e5 1-0\n\n\
                   [Event \"next\"]\n\n1. d4 *";
        let mut parser = parser(pgn);
        let game = parser.read_game().unwrap().unwrap();
        assert_eq!(game.metadata().get("Event"), Some("next"));
        assert!(parser.read_game().unwrap().is_none());
    }

    #[test]
    fn resync_after_error() {
        let pgn = "[Event \"bad\"]\n\n1. Qh5 e5 1-0\n\n\
                   [Event \"good\"]\n\n1. e4 *";
        let mut parser = parser(pgn);
        assert!(parser.read_game().is_err());
        parser.skip_to_next_game().unwrap();
        let game = parser.read_game().unwrap().unwrap();
        assert_eq!(game.metadata().get("Event"), Some("good"));
    }
}
