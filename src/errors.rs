use std::io;

use shakmaty::{fen::ParseFenError, san::SanError, PositionError};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error when selecting endgames from an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// The archive could not be opened or fetched. Nothing has been
    /// scanned.
    #[error("archive unavailable: {source}")]
    SourceUnavailable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// A game could not be decoded. Games yielded before it remain
    /// valid, but the rest of the stream is abandoned.
    #[error("failed to decode game {game}: {source}")]
    Decode {
        /// Zero-based index of the game in the archive.
        game: usize,
        #[source]
        source: DecodeError,
    },
    /// Selected games could not be written.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    /// A configuration value is outside of its domain.
    #[error("invalid {name}: {reason}")]
    Parameter {
        name: &'static str,
        reason: String,
    },
}

impl Error {
    pub(crate) fn source_unavailable<E>(err: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::SourceUnavailable { source: err.into() }
    }
}

/// Reason a single game could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("read error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid FEN tag: {0}")]
    Fen(#[from] ParseFenError),
    #[error("illegal FEN tag: {0}")]
    Position(String),
    #[error("unreadable token {token:?} at ply {ply}")]
    Token { ply: usize, token: String },
    #[error("bad move {san} at ply {ply}: {source}")]
    San {
        ply: usize,
        san: String,
        #[source]
        source: SanError,
    },
}

impl<P> From<PositionError<P>> for DecodeError {
    fn from(err: PositionError<P>) -> DecodeError {
        DecodeError::Position(err.to_string())
    }
}
