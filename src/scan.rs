//! Stream games out of a PGN archive and keep the qualifying ones.

use std::{
    fmt,
    io::{BufReader, Read},
    iter::FusedIterator,
    ops::ControlFlow,
};

use pgn_reader::{Outcome, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, EnPassantMode, Position};
use tracing::{debug, info, trace};

use crate::{
    errors::{DecodeError, Error},
    game::{GameRecord, Ply},
    params::FilterParams,
    raw::{self, RawGames},
    window,
};

/// Builds a [`GameRecord`] from the mainline of a game, replaying every
/// move to record the positions.
#[derive(Debug, Default)]
struct GameDecoder;

#[derive(Debug)]
struct Movetext {
    pos: Chess,
    game: GameRecord,
}

fn starting_position(fen: &str) -> Result<Chess, DecodeError> {
    let fen: Fen = fen.parse()?;
    Ok(fen.into_position(CastlingMode::Chess960)?)
}

impl Visitor for GameDecoder {
    type Tags = GameRecord;
    type Movetext = Movetext;
    type Output = Result<GameRecord, DecodeError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameRecord::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.push_tag(String::from_utf8_lossy(name), value.decode_utf8_lossy());
        ControlFlow::Continue(())
    }

    fn begin_movetext(
        &mut self,
        mut game: Self::Tags,
    ) -> ControlFlow<Self::Output, Self::Movetext> {
        // Support games from a non-standard starting position.
        let pos = match game.tag("FEN").map(starting_position) {
            Some(Ok(pos)) => pos,
            Some(Err(err)) => return ControlFlow::Break(Err(err)),
            None => Chess::default(),
        };
        game.set_first_move(pos.turn(), pos.fullmoves());
        ControlFlow::Continue(Movetext { pos, game })
    }

    fn san(
        &mut self,
        movetext: &mut Self::Movetext,
        san_plus: SanPlus,
    ) -> ControlFlow<Self::Output> {
        match san_plus.san.to_move(&movetext.pos) {
            Ok(m) => {
                movetext.pos.play_unchecked(m);
                let fen = Fen::from_position(&movetext.pos, EnPassantMode::Legal);
                let ply = Ply::new(san_plus.to_string(), fen.to_string());
                movetext.game.push_ply(ply);
                ControlFlow::Continue(())
            }
            Err(err) => ControlFlow::Break(Err(DecodeError::San {
                ply: movetext.game.plies().len(),
                san: san_plus.to_string(),
                source: err,
            })),
        }
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true)) // stay in the mainline
    }

    fn outcome(
        &mut self,
        movetext: &mut Self::Movetext,
        outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        movetext.game.set_outcome(outcome);
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        Ok(movetext.game)
    }
}

/// Decodes the text of a single game. Returns `None` if it holds no game
/// at all.
fn decode_game(raw: &[u8], decoder: &mut GameDecoder) -> Result<Option<GameRecord>, DecodeError> {
    raw::check_movetext(raw)?;
    Reader::new(raw).read_game(decoder)?.transpose()
}

/// Lazily yields the games of a PGN archive that contain a qualifying
/// endgame, in archive order.
///
/// Only one game is held in memory at a time. The first decode error is
/// yielded as `Err` and ends the iteration: there is no safe point to
/// resume from in a corrupted archive.
///
/// # Examples
///
/// ```
/// use endgame_filter::{FilterParams, Scanner};
///
/// let pgn = b"[Event \"Casual\"]\n\n1. e4 e5 2. Nf3 Nc6 *\n";
///
/// let mut scanner = Scanner::new(&pgn[..], FilterParams::default());
/// assert!(scanner.next().is_none());
/// assert_eq!(scanner.games_scanned(), 1);
/// assert_eq!(scanner.params().min_run, 5);
/// ```
pub struct Scanner<R> {
    games: RawGames<BufReader<R>>,
    decoder: GameDecoder,
    params: FilterParams,
    scanned: usize,
    matched: usize,
    done: bool,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R, params: FilterParams) -> Scanner<R> {
        Scanner {
            games: RawGames::new(BufReader::new(reader)),
            decoder: GameDecoder,
            params,
            scanned: 0,
            matched: 0,
            done: false,
        }
    }
}

impl<R> fmt::Debug for Scanner<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("params", &self.params)
            .field("scanned", &self.scanned)
            .field("matched", &self.matched)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<R> Scanner<R> {
    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Number of games decoded so far.
    pub fn games_scanned(&self) -> usize {
        self.scanned
    }

    /// Number of games yielded so far.
    pub fn games_matched(&self) -> usize {
        self.matched
    }

    fn fail(&mut self, err: DecodeError) -> Error {
        self.done = true;
        debug!(game = self.scanned, %err, "abandoning archive");
        Error::Decode {
            game: self.scanned,
            source: err,
        }
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<GameRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let raw = match self.games.next_game() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.done = true;
                    info!(
                        scanned = self.scanned,
                        matched = self.matched,
                        "archive exhausted"
                    );
                    break;
                }
                Err(err) => return Some(Err(self.fail(err.into()))),
            };

            let game = match decode_game(&raw, &mut self.decoder) {
                Ok(Some(game)) => game,
                Ok(None) => continue,
                Err(err) => return Some(Err(self.fail(err))),
            };

            let index = self.scanned;
            self.scanned += 1;

            if window::qualifies(game.plies(), &self.params) {
                self.matched += 1;
                debug!(game = index, plies = game.plies().len(), "endgame found");
                return Some(Ok(game));
            }
            trace!(game = index, plies = game.plies().len(), "rejected");
        }
        None
    }
}

impl<R: Read> FusedIterator for Scanner<R> {}

/// Scans `reader` for games with a qualifying endgame.
pub fn scan<R: Read>(reader: R, params: FilterParams) -> Scanner<R> {
    Scanner::new(reader, params)
}
