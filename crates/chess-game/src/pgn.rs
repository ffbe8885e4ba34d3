//! PGN input and output.
//!
//! [`lexer`] turns a byte stream into tokens, [`parser`] drives a game's
//! edit cursors from those tokens, and [`writer`] renders a game back into
//! standard PGN text. The free functions below cover the common whole-stream
//! cases.

use std::io::{Read, Write};

use crate::error::{PgnError, PgnWriteError};
use crate::game::Game;

pub mod lexer;
pub mod parser;
pub mod writer;

/// Reads every game from a PGN stream.
///
/// Stops at the first error; for per-game error recovery use
/// [`PgnParser`](crate::PgnParser) directly together with
/// [`skip_to_next_game`](crate::PgnParser::skip_to_next_game).
pub fn read_games<R: Read>(input: R) -> Result<Vec<Game>, PgnError> {
    let mut parser = parser::PgnParser::new(input);
    let mut games = Vec::new();
    while let Some(game) = parser.read_game()? {
        games.push(game);
    }
    Ok(games)
}

/// Writes a single game as PGN.
pub fn write_game<W: Write>(output: W, game: &Game) -> Result<(), PgnWriteError> {
    writer::PgnWriter::new(output).write_game(game)
}

/// Writes several games to one PGN stream.
pub fn write_games<'a, W, I>(output: W, games: I) -> Result<(), PgnWriteError>
where
    W: Write,
    I: IntoIterator<Item = &'a Game>,
{
    let mut writer = writer::PgnWriter::new(output);
    for game in games {
        writer.write_game(game)?;
    }
    Ok(())
}
