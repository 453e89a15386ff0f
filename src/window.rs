//! Decide if a game reaches a qualifying endgame.

use crate::{
    game::EncodedPosition,
    params::{FilterParams, RunMode},
    placement,
};

/// How a single position compares against [`FilterParams`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Classification {
    /// Fewer than `max_pieces` pieces on the board.
    pub under_max_pieces: bool,
    /// Only pieces from the allowed alphabet (and all required pieces,
    /// if any).
    pub within_allowed: bool,
}

impl Classification {
    /// Both conditions hold.
    pub fn is_match(self) -> bool {
        self.under_max_pieces && self.within_allowed
    }
}

/// Classifies a position.
pub fn classify(fen: &str, params: &FilterParams) -> Classification {
    Classification {
        under_max_pieces: placement::count_pieces(fen) < params.max_pieces,
        within_allowed: placement::is_within_allowed(fen, &params.allowed)
            && (params.required.is_empty() || placement::has_required(fen, &params.required)),
    }
}

/// Number of matching plies in the endgame window, counted according to
/// `params.run_mode`.
pub fn run_length<P: EncodedPosition>(history: &[P], params: &FilterParams) -> usize {
    let window = history.get(params.start_ply..).unwrap_or_default();
    let matches = window
        .iter()
        .map(|ply| classify(ply.fen(), params).is_match());

    match params.run_mode {
        RunMode::Cumulative => matches.filter(|&m| m).count(),
        RunMode::Consecutive => {
            let mut longest = 0;
            let mut current = 0;
            for m in matches {
                current = if m { current + 1 } else { 0 };
                longest = longest.max(current);
            }
            longest
        }
    }
}

/// Tests if a game history contains a qualifying endgame.
///
/// Games with fewer than `start_ply + min_run` plies are rejected
/// without looking at any position.
///
/// # Examples
///
/// ```
/// use endgame_filter::{window, FilterParams};
///
/// let params = FilterParams {
///     start_ply: 2,
///     min_run: 2,
///     ..FilterParams::default()
/// };
///
/// let history = [
///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
///     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
///     "8/8/8/4p1K1/2k1P3/8/8/8 b - - 0 60",
///     "8/8/8/4p3/2k1P1K1/8/8/8 w - - 1 61",
/// ];
/// assert!(window::qualifies(&history, &params));
/// assert!(!window::qualifies(&history[..3], &params));
/// ```
pub fn qualifies<P: EncodedPosition>(history: &[P], params: &FilterParams) -> bool {
    if history.len() < params.min_plies() {
        return false;
    }
    run_length(history, params) >= params.min_run
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::symbols::SymbolSet;

    const OPENING: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
    const PAWN_ENDING: &str = "8/8/8/4p1K1/2k1P3/8/8/8 b - - 0 1";
    const ROOK_ENDING: &str = "4k2r/8/8/8/8/8/3R4/4K3 w - - 0 1";
    const CROWDED_PAWN_ENDING: &str = "8/5k2/3p4/1p1Pp2p/pP2Pp1P/P4P1K/8/8 b - - 99 50";

    struct Counted<'a> {
        fen: &'a str,
        reads: &'a Cell<usize>,
    }

    impl EncodedPosition for Counted<'_> {
        fn fen(&self) -> &str {
            self.reads.set(self.reads.get() + 1);
            self.fen
        }
    }

    fn history(opening: usize, tail: &[&'static str]) -> Vec<&'static str> {
        let mut history = vec![OPENING; opening];
        history.extend_from_slice(tail);
        history
    }

    #[test]
    fn test_classify() {
        let params = FilterParams::default();
        assert_eq!(
            classify(PAWN_ENDING, &params),
            Classification {
                under_max_pieces: true,
                within_allowed: true,
            }
        );
        assert_eq!(
            classify(ROOK_ENDING, &params),
            Classification {
                under_max_pieces: true,
                within_allowed: false,
            }
        );
        assert_eq!(
            classify(CROWDED_PAWN_ENDING, &params),
            Classification {
                under_max_pieces: false,
                within_allowed: true,
            }
        );
        assert!(!classify(OPENING, &params).is_match());
    }

    #[test]
    fn test_classify_required() {
        let params = FilterParams {
            allowed: SymbolSet::ALL_PIECES,
            required: "qQ".parse().expect("valid symbols"),
            ..FilterParams::default()
        };
        assert!(!classify(ROOK_ENDING, &params).within_allowed);
        assert!(classify(ROOK_ENDING, &params).under_max_pieces);

        let params = FilterParams {
            required: "r".parse().expect("valid symbols"),
            ..params
        };
        assert!(classify(ROOK_ENDING, &params).is_match());
    }

    #[test]
    fn test_short_game_reads_nothing() {
        let reads = Cell::new(0);
        let history: Vec<_> = (0..44)
            .map(|_| Counted {
                fen: PAWN_ENDING,
                reads: &reads,
            })
            .collect();

        assert!(!qualifies(&history, &FilterParams::default()));
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_window_reads_from_start_ply() {
        let reads = Cell::new(0);
        let history: Vec<_> = (0..50)
            .map(|_| Counted {
                fen: PAWN_ENDING,
                reads: &reads,
            })
            .collect();

        assert!(qualifies(&history, &FilterParams::default()));
        // One read per ply in the window.
        assert_eq!(reads.get(), 10);
    }

    #[test]
    fn test_qualifies_pawn_endgame() {
        let params = FilterParams::default();
        assert!(qualifies(&history(40, &[PAWN_ENDING; 5]), &params));
        assert!(qualifies(&history(40, &[PAWN_ENDING; 20]), &params));
        assert!(!qualifies(&history(40, &[PAWN_ENDING; 4]), &params));
    }

    #[test]
    fn test_endgame_before_window_ignored() {
        let params = FilterParams::default();
        let mut game = history(0, &[PAWN_ENDING; 40]);
        game.extend_from_slice(&[ROOK_ENDING; 10]);
        assert!(!qualifies(&game, &params));
    }

    #[test]
    fn test_both_conditions_on_same_ply() {
        let params = FilterParams::default();
        // Each ply satisfies only one of the conditions.
        let tail = [
            ROOK_ENDING,
            CROWDED_PAWN_ENDING,
            ROOK_ENDING,
            CROWDED_PAWN_ENDING,
            ROOK_ENDING,
            CROWDED_PAWN_ENDING,
        ];
        assert!(!qualifies(&history(40, &tail), &params));
    }

    #[test]
    fn test_cumulative_does_not_reset() {
        let params = FilterParams::default();
        let tail = [
            PAWN_ENDING,
            ROOK_ENDING,
            PAWN_ENDING,
            PAWN_ENDING,
            ROOK_ENDING,
            PAWN_ENDING,
            PAWN_ENDING,
        ];
        let game = history(40, &tail);
        assert_eq!(run_length(&game, &params), 5);
        assert!(qualifies(&game, &params));

        let consecutive = FilterParams {
            run_mode: RunMode::Consecutive,
            ..params
        };
        assert_eq!(run_length(&game, &consecutive), 2);
        assert!(!qualifies(&game, &consecutive));
    }

    #[test]
    fn test_consecutive_longest_streak() {
        let params = FilterParams {
            run_mode: RunMode::Consecutive,
            ..FilterParams::default()
        };
        let mut tail = vec![PAWN_ENDING, PAWN_ENDING, ROOK_ENDING];
        tail.extend_from_slice(&[PAWN_ENDING; 6]);
        tail.push(ROOK_ENDING);
        let game = history(40, &tail);
        assert_eq!(run_length(&game, &params), 6);
        assert!(qualifies(&game, &params));
    }

    #[test]
    fn test_zero_thresholds() {
        let params = FilterParams {
            start_ply: 0,
            min_run: 0,
            ..FilterParams::default()
        };
        let empty: [&str; 0] = [];
        assert!(qualifies(&empty, &params));

        let params = FilterParams {
            max_pieces: 0,
            min_run: 1,
            ..params
        };
        assert!(!qualifies(&[PAWN_ENDING], &params));
    }

    #[test]
    fn test_start_ply_past_end() {
        let params = FilterParams {
            start_ply: 100,
            min_run: 0,
            ..FilterParams::default()
        };
        assert!(!qualifies(&history(0, &[PAWN_ENDING; 10]), &params));
        assert_eq!(run_length(&history(0, &[PAWN_ENDING; 10]), &params), 0);
    }
}
