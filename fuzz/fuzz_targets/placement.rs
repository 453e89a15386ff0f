#![no_main]

use endgame_filter::{placement, SymbolSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let fen = String::from_utf8_lossy(data);

    let pieces = placement::count_pieces(&fen);
    assert!(pieces <= placement::placement_field(&fen).len());

    let present = placement::present(&fen);
    assert!(placement::has_required(&fen, &present));
    assert!(placement::has_required(&fen, &SymbolSet::EMPTY));

    if placement::is_within_allowed(&fen, &SymbolSet::KINGS_AND_PAWNS) {
        assert!(placement::is_within_allowed(&fen, &SymbolSet::ALL_PIECES));
    }
});
