//! Classify positions by the pieces on the board.
//!
//! The functions in this module read the placement field of a FEN, e.g.
//! `8/8/8/4p1K1/2k1P3/8/8/8` in `8/8/8/4p1K1/2k1P3/8/8/8 b - - 0 1`.
//! They never build a board and never fail: input that is not a valid
//! FEN simply produces counts and answers for whatever characters are
//! there.
//!
//! # Examples
//!
//! ```
//! use endgame_filter::{placement, SymbolSet};
//!
//! let fen = "8/8/8/4p1K1/2k1P3/8/8/8 b - - 0 1";
//! assert_eq!(placement::count_pieces(fen), 4);
//! assert!(placement::is_within_allowed(fen, &SymbolSet::KINGS_AND_PAWNS));
//! ```

use crate::symbols::SymbolSet;

/// The placement field of `position`: everything before the first
/// space, or the whole string.
#[inline]
pub fn placement_field(position: &str) -> &str {
    position
        .split_once(' ')
        .map_or(position, |(field, _)| field)
}

#[inline]
fn is_structural(ch: char) -> bool {
    ch == '/' || ch.is_ascii_digit()
}

fn symbols(position: &str) -> impl Iterator<Item = char> + '_ {
    placement_field(position)
        .chars()
        .filter(|&ch| !is_structural(ch))
}

/// Counts the pieces, i.e. the letters, in the placement field.
pub fn count_pieces(position: &str) -> usize {
    placement_field(position)
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .count()
}

/// Tests if every symbol in the placement field is in `allowed`.
///
/// An empty placement field is never within any alphabet.
pub fn is_within_allowed(position: &str, allowed: &SymbolSet) -> bool {
    if placement_field(position).is_empty() {
        return false;
    }
    symbols(position).all(|ch| allowed.contains(ch))
}

/// Tests if every symbol of `required` appears at least once in the
/// placement field.
pub fn has_required(position: &str, required: &SymbolSet) -> bool {
    required.is_subset(present(position))
}

/// The set of symbols present in the placement field.
pub fn present(position: &str) -> SymbolSet {
    symbols(position).collect()
}
