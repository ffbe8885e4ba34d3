//! Matching SAN moves against legal moves, and generating minimal SAN.

use std::collections::HashSet;

use chess_rules::{CheckState, File, Move, Rank, Role};

use crate::san::SanMove;

/// Returns true if `mov` is described by `san`, ignoring the piece type.
///
/// Used by the forgiving parser path where a move token carries no piece
/// letter (or a wrong one) but is otherwise unambiguous.
pub fn matches_any_piece(san: &SanMove, mov: &Move) -> bool {
    if san.target != mov.to {
        return false;
    }
    if san
        .disambiguation_file
        .is_some_and(|file| file != mov.from.file())
    {
        return false;
    }
    if san
        .disambiguation_rank
        .is_some_and(|rank| rank != mov.from.rank())
    {
        return false;
    }
    if san.capturing != mov.captured.is_some() {
        return false;
    }
    san.promotion == mov.promoted
}

/// Returns true if `mov` is described by `san`.
pub fn matches(san: &SanMove, mov: &Move) -> bool {
    san.piece == mov.piece && matches_any_piece(san, mov)
}

/// Filters `moves` down to those described by `san`.
pub fn match_list(san: &SanMove, moves: &[Move]) -> Vec<Move> {
    moves
        .iter()
        .filter(|mov| matches(san, mov))
        .copied()
        .collect()
}

/// Filters `moves` down to those described by `san`, ignoring piece types.
pub fn match_list_any_piece(san: &SanMove, moves: &[Move]) -> Vec<Move> {
    moves
        .iter()
        .filter(|mov| matches_any_piece(san, mov))
        .copied()
        .collect()
}

/// Generates the minimally-disambiguated SAN for `mov`.
///
/// `legal_moves` must be the legal-move list of the position the move is
/// played in; it decides how much disambiguation is needed. Returns `None`
/// when `mov` is not in the list. Check and checkmate decoration is not
/// produced here; it depends on the resulting position and is added by the
/// writer.
pub fn generate_san(mov: &Move, legal_moves: &[Move]) -> Option<SanMove> {
    if !legal_moves.contains(mov) {
        return None;
    }

    if mov.is_castling() {
        let original = if mov.to.file() == File::C {
            "O-O-O"
        } else {
            "O-O"
        };
        return Some(SanMove {
            original: original.to_string(),
            piece: mov.piece,
            target: mov.to,
            capturing: false,
            promotion: None,
            check_state: CheckState::None,
            disambiguation_file: None,
            disambiguation_rank: None,
            suffix_annotation: None,
        });
    }

    let same_piece_and_target: Vec<&Move> = legal_moves
        .iter()
        .filter(|other| other.piece == mov.piece && other.to == mov.to)
        .collect();

    let mut text = String::new();
    let mut disambiguation_file = None;
    let mut disambiguation_rank = None;

    if mov.piece.role == Role::Pawn {
        if mov.captured.is_some() {
            text.push(mov.from.file().char());
        }
    } else {
        text.push(mov.piece.role.upper_char());
        if same_piece_and_target.len() > 1 {
            (disambiguation_file, disambiguation_rank) =
                determine_disambiguation(mov, &same_piece_and_target);
            if let Some(file) = disambiguation_file {
                text.push(file.char());
            }
            if let Some(rank) = disambiguation_rank {
                text.push(rank.char());
            }
        }
    }

    if mov.captured.is_some() {
        text.push('x');
    }
    text.push_str(&mov.to.to_string());
    if let Some(promoted) = mov.promoted {
        text.push('=');
        text.push(promoted.role.upper_char());
    }

    Some(SanMove {
        original: text,
        piece: mov.piece,
        target: mov.to,
        capturing: mov.captured.is_some(),
        promotion: mov.promoted,
        check_state: CheckState::None,
        disambiguation_file,
        disambiguation_rank,
        suffix_annotation: None,
    })
}

/// Picks the shortest origin qualifier that singles `mov` out of
/// `candidates` (all moves of the same piece to the same target).
fn determine_disambiguation(
    mov: &Move,
    candidates: &[&Move],
) -> (Option<File>, Option<Rank>) {
    let files: HashSet<File> = candidates.iter().map(|other| other.from.file()).collect();
    let ranks: HashSet<Rank> = candidates.iter().map(|other| other.from.rank()).collect();

    if files.len() == candidates.len() {
        (Some(mov.from.file()), None)
    } else if ranks.len() == candidates.len() {
        (None, Some(mov.from.rank()))
    } else {
        (Some(mov.from.file()), Some(mov.from.rank()))
    }
}
