use std::io::{self, Write};

use crate::{
    errors::{Error, Result},
    game::GameRecord,
};

/// Writes a game as PGN, followed by a blank line that separates it
/// from the next game.
pub fn write_game<W: Write>(out: &mut W, game: &GameRecord) -> io::Result<()> {
    writeln!(out, "{game}")
}

/// Writes every game of `games` to `out`, in order, stopping at the
/// first error. Returns the number of games written.
pub fn write_all<W, I>(out: &mut W, games: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<GameRecord>>,
{
    let mut written = 0;
    for game in games {
        write_game(out, &game?).map_err(Error::Output)?;
        written += 1;
    }
    out.flush().map_err(Error::Output)?;
    Ok(written)
}
