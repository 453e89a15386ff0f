use std::fmt;

use crate::symbols::SymbolSet;

/// How matching plies in the endgame window are counted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RunMode {
    /// Count every matching ply in the window. Non-matching plies do not
    /// reset the count.
    #[default]
    Cumulative,
    /// Count the longest streak of consecutive matching plies.
    Consecutive,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunMode::Cumulative => "cumulative",
            RunMode::Consecutive => "consecutive",
        })
    }
}

/// Parameters selecting which endgames qualify.
///
/// A game qualifies if, from ply index `start_ply` on, at least `min_run`
/// positions have fewer than `max_pieces` pieces, all drawn from the
/// `allowed` alphabet.
///
/// # Examples
///
/// ```
/// use endgame_filter::{FilterParams, SymbolSet};
///
/// let params = FilterParams::default();
/// assert_eq!(params.allowed, SymbolSet::KINGS_AND_PAWNS);
/// assert_eq!(params.max_pieces, 8);
/// assert_eq!(params.start_ply, 40);
/// assert_eq!(params.min_run, 5);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterParams {
    /// Piece symbols that may appear on the board.
    pub allowed: SymbolSet,
    /// Exclusive upper bound on the number of pieces.
    pub max_pieces: usize,
    /// Zero-based index of the first ply in the window.
    pub start_ply: usize,
    /// Number of matching plies needed.
    pub min_run: usize,
    pub run_mode: RunMode,
    /// Piece symbols that must all be on the board. Empty by default.
    pub required: SymbolSet,
}

impl FilterParams {
    /// Minimum number of plies a game needs to possibly qualify.
    pub fn min_plies(&self) -> usize {
        self.start_ply.saturating_add(self.min_run)
    }
}

impl Default for FilterParams {
    fn default() -> FilterParams {
        FilterParams {
            allowed: SymbolSet::KINGS_AND_PAWNS,
            max_pieces: 8,
            start_ply: 40,
            min_run: 5,
            run_mode: RunMode::Cumulative,
            required: SymbolSet::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_plies() {
        assert_eq!(FilterParams::default().min_plies(), 45);

        let params = FilterParams {
            start_ply: usize::MAX,
            ..FilterParams::default()
        };
        assert_eq!(params.min_plies(), usize::MAX);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_defaults() {
        let params: FilterParams =
            serde_json::from_str(r#"{"allowed": "kKrR", "run_mode": "consecutive"}"#)
                .expect("valid params");
        assert_eq!(params.allowed, "kKrR".parse().expect("valid symbols"));
        assert_eq!(params.run_mode, RunMode::Consecutive);
        assert_eq!(params.max_pieces, 8);
        assert_eq!(params.start_ply, 40);
    }
}
