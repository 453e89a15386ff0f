//! Find chess games that reach restricted-material endgames.
//!
//! A game qualifies if, from a given ply on, enough of its positions have
//! few pieces on the board, all drawn from an allowed alphabet, e.g.
//! only kings and pawns.
//!
//! # Examples
//!
//! Select king and pawn endgames from a PGN archive:
//!
//! ```
//! use endgame_filter::{scan, FilterParams};
//!
//! let pgn = b"[Event \"Example\"]
//!
//! 1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *";
//!
//! let params = FilterParams {
//!     start_ply: 0,
//!     min_run: 1,
//!     ..FilterParams::default()
//! };
//!
//! let games = scan(&pgn[..], params).collect::<Result<Vec<_>, _>>()?;
//! assert!(games.is_empty()); // still far too many pieces
//! # Ok::<_, endgame_filter::Error>(())
//! ```
//!
//! Classify a single position:
//!
//! ```
//! use endgame_filter::{window, FilterParams};
//!
//! let c = window::classify("8/8/8/4p1K1/2k1P3/8/8/8 b - - 0 1", &FilterParams::default());
//! assert!(c.under_max_pieces && c.within_allowed);
//! ```
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   [`FilterParams`], [`RunMode`] and [`SymbolSet`].

#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod errors;
mod game;
mod params;
mod raw;
mod symbols;

pub mod archive;
pub mod placement;
pub mod scan;
pub mod sink;
pub mod window;

pub use errors::{DecodeError, Error, Result};
pub use game::{EncodedPosition, GameRecord, Ply};
pub use params::{FilterParams, RunMode};
pub use scan::{scan, Scanner};
pub use symbols::SymbolSet;
