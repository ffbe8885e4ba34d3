//! The PGN writer: a game tree out as standard PGN text.
//!
//! Tags come first, the Seven Tag Roster in canonical order and every other
//! tag sorted by name. Movetext is produced by a recursive tree walk that
//! regenerates each move's SAN against its parent position, and flows
//! through a small token writer that wraps lines at 79 columns.

use std::io::Write;

use chess_rules::{CheckState, Color};

use crate::cursor::Cursor;
use crate::error::PgnWriteError;
use crate::game::Game;
use crate::metadata::GameMetadata;
use crate::san::matcher::generate_san;

const MAX_LINE_LENGTH: usize = 79;

/// The token classes the line-wrapping writer distinguishes.
///
/// A space is written before a token when the previous one was a move
/// number, a closed variation, a move, a comment or a NAG; the one
/// exception is a `)` directly after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteToken {
    MoveNumber,
    Move,
    Nag,
    Comment,
    RavStart,
    RavEnd,
}

/// A writer producing PGN text for games.
pub struct PgnWriter<W: Write> {
    output: W,
    line_length: usize,
    previous: Option<WriteToken>,
    /// Set at the start of a variation and after one closes, so the next
    /// Black move re-states its move number (`7... c5`).
    needs_black_number: bool,
}

impl<W: Write> PgnWriter<W> {
    /// Creates a writer over `output`.
    pub fn new(output: W) -> PgnWriter<W> {
        PgnWriter {
            output,
            line_length: 0,
            previous: None,
            needs_black_number: true,
        }
    }

    /// Writes a complete game: tags, optional leading comment, movetext and
    /// the result token.
    pub fn write_game(&mut self, game: &Game) -> Result<(), PgnWriteError> {
        self.line_length = 0;
        self.previous = None;
        self.needs_black_number = true;

        self.write_metadata(game.metadata())?;

        let root = game.cursor();
        let overall_comment = root.comment();
        if !overall_comment.is_empty() {
            self.write_comment(&overall_comment)?;
            writeln!(self.output)?;
            writeln!(self.output)?;
            self.line_length = 0;
            self.previous = None;
        }

        self.write_line(root)?;

        if self.line_length > 0 {
            writeln!(self.output)?;
        }
        let result = game.metadata().get("Result").unwrap_or("?");
        writeln!(self.output, "{result}")?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Writes the tag section followed by a blank line.
    ///
    /// All seven roster tags are emitted (with `?` standing in for missing
    /// values), then the remaining tags sorted by name, duplicates included.
    pub fn write_metadata(&mut self, metadata: &GameMetadata) -> Result<(), PgnWriteError> {
        for name in GameMetadata::STR_TAGS {
            let value = metadata.get(name).unwrap_or("?");
            writeln!(self.output, "[{name} \"{value}\"]")?;
        }
        let mut others: Vec<_> = metadata
            .iter()
            .filter(|tag| !GameMetadata::is_str_tag(&tag.name))
            .collect();
        others.sort_by(|a, b| a.name.cmp(&b.name));
        for tag in others {
            writeln!(self.output, "[{} \"{}\"]", tag.name, tag.value)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Writes the moves below `node`, main line first, with variations in
    /// parentheses after the move they branch from.
    fn write_line(&mut self, start: Cursor<'_>) -> Result<(), PgnWriteError> {
        let mut node = start;
        while let Some(main) = node.child(0) {
            self.write_move(&main)?;
            for index in 1..node.child_count() {
                let variation = node.child(index).expect("child index is in range");
                self.write_variation(variation)?;
            }
            node = main;
        }
        Ok(())
    }

    fn write_variation(&mut self, variation: Cursor<'_>) -> Result<(), PgnWriteError> {
        self.put(WriteToken::RavStart, "(")?;
        self.needs_black_number = true;
        let premove_comment = variation.premove_comment();
        if !premove_comment.is_empty() {
            self.write_comment(&premove_comment)?;
        }
        self.write_move(&variation)?;
        self.write_line(variation)?;
        self.put(WriteToken::RavEnd, ")")?;
        self.needs_black_number = true;
        Ok(())
    }

    /// Writes a single move: number, SAN with check decoration, NAGs and
    /// the post-move comment.
    fn write_move(&mut self, cursor: &Cursor<'_>) -> Result<(), PgnWriteError> {
        let mov = cursor.mov().expect("a non-root node always has a move");
        let parent = cursor.parent().expect("a non-root node has a live parent");
        let before = parent.position()?;

        if mov.piece.color == Color::White {
            self.put(
                WriteToken::MoveNumber,
                &format!("{}.", before.fullmove_number()),
            )?;
        } else if self.needs_black_number {
            self.put(
                WriteToken::MoveNumber,
                &format!("{}...", before.fullmove_number()),
            )?;
        }
        self.needs_black_number = false;

        let san = generate_san(&mov, &before.legal_moves())
            .ok_or_else(|| PgnWriteError::UnwritableMove(mov.to_string()))?;
        let mut text = san.original;
        match cursor.position()?.check_state() {
            CheckState::Check => text.push('+'),
            CheckState::Checkmate => text.push('#'),
            CheckState::None => {}
        }
        self.put(WriteToken::Move, &text)?;

        for nag in cursor.nags() {
            self.put(WriteToken::Nag, &format!("${nag}"))?;
        }
        let comment = cursor.comment();
        if !comment.is_empty() {
            self.write_comment(&comment)?;
        }
        Ok(())
    }

    /// Writes `{text}`, wrapping between words where needed.
    fn write_comment(&mut self, text: &str) -> Result<(), PgnWriteError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        match words.as_slice() {
            [] => self.put(WriteToken::Comment, "{}"),
            [only] => self.put(WriteToken::Comment, &format!("{{{only}}}")),
            [first, middle @ .., last] => {
                self.put(WriteToken::Comment, &format!("{{{first}"))?;
                for word in middle {
                    self.put(WriteToken::Comment, word)?;
                }
                self.put(WriteToken::Comment, &format!("{last}}}"))
            }
        }
    }

    /// Writes one token, inserting the separating space or a line break.
    fn put(&mut self, kind: WriteToken, text: &str) -> Result<(), PgnWriteError> {
        let space = match self.previous {
            Some(previous) => {
                let separated = matches!(
                    previous,
                    WriteToken::MoveNumber
                        | WriteToken::RavEnd
                        | WriteToken::Move
                        | WriteToken::Comment
                        | WriteToken::Nag
                );
                separated && !(previous == WriteToken::Move && kind == WriteToken::RavEnd)
            }
            None => false,
        };

        let needed = text.len() + usize::from(space);
        if self.line_length > 0 && self.line_length + needed > MAX_LINE_LENGTH {
            writeln!(self.output)?;
            write!(self.output, "{text}")?;
            self.line_length = text.len();
        } else {
            if space {
                write!(self.output, " ")?;
                self.line_length += 1;
            }
            write!(self.output, "{text}")?;
            self.line_length += text.len();
        }
        self.previous = Some(kind);
        Ok(())
    }
}
