#![no_main]

use endgame_filter::{scan, FilterParams, SymbolSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let params = FilterParams {
        allowed: SymbolSet::ALL_PIECES,
        max_pieces: 33,
        start_ply: 0,
        min_run: 0,
        ..FilterParams::default()
    };

    // Nothing follows an error.
    let mut scanner = scan(data, params);
    while let Some(Ok(_)) = scanner.next() {}
    assert!(scanner.next().is_none());
});
