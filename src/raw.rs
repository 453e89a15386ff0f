//! Raw text of the games in a PGN archive.

use std::{
    io::{self, BufRead},
    mem,
};

use pgn_reader::{Nag, SanPlus};

use crate::errors::DecodeError;

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Splits a PGN archive into the text of its games.
///
/// A game is a section of tag lines followed by movetext. The movetext
/// ends at a blank line or at the next tag line, unless it is inside a
/// brace comment.
#[derive(Debug)]
pub(crate) struct RawGames<R> {
    inner: R,
    line: Vec<u8>,
    pending: Vec<u8>,
    started: bool,
}

impl<R: BufRead> RawGames<R> {
    pub(crate) fn new(inner: R) -> RawGames<R> {
        RawGames {
            inner,
            line: Vec::new(),
            pending: Vec::new(),
            started: false,
        }
    }

    /// Reads the text of the next game. Returns `None` at the end of the
    /// archive.
    pub(crate) fn next_game(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut game = mem::take(&mut self.pending);
        let mut in_movetext = false;
        let mut in_comment = false;

        loop {
            self.line.clear();
            if self.inner.read_until(b'\n', &mut self.line)? == 0 {
                break;
            }
            if !self.started {
                self.started = true;
                if self.line.starts_with(BOM) {
                    self.line.drain(..BOM.len());
                }
            }

            let blank = self.line.trim_ascii().is_empty();
            if in_movetext {
                if !in_comment && (blank || self.line.starts_with(b"[")) {
                    if !blank {
                        // First tag of the next game.
                        mem::swap(&mut self.pending, &mut self.line);
                    }
                    break;
                }
                in_comment = comment_open_after(&self.line, in_comment);
            } else if blank {
                if game.is_empty() {
                    continue;
                }
            } else if !self.line.starts_with(b"[") && !self.line.starts_with(b"%") {
                in_movetext = true;
                in_comment = comment_open_after(&self.line, false);
            }

            game.extend_from_slice(&self.line);
        }

        Ok(if game.trim_ascii().is_empty() {
            None
        } else {
            Some(game)
        })
    }
}

fn comment_open_after(line: &[u8], mut open: bool) -> bool {
    if line.starts_with(b"%") {
        return open;
    }
    for &ch in line {
        match ch {
            b'}' if open => open = false,
            b'{' if !open => open = true,
            b';' if !open => break,
            _ => (),
        }
    }
    open
}

/// The movetext of a game, after its tag section.
fn movetext(game: &[u8]) -> &[u8] {
    let mut rest = game;
    while !rest.is_empty() {
        let line_len = rest
            .iter()
            .position(|&ch| ch == b'\n')
            .map_or(rest.len(), |i| i + 1);
        let line = &rest[..line_len];
        if !line.trim_ascii().is_empty() && !line.starts_with(b"[") && !line.starts_with(b"%") {
            break;
        }
        rest = &rest[line_len..];
    }
    rest
}

fn is_delimiter(ch: u8) -> bool {
    matches!(
        ch,
        b' ' | b'\t' | b'\n' | b'\r' | b'{' | b'}' | b'(' | b')' | b'!' | b'?' | b'$' | b';' | b'.'
    )
}

fn find(text: &[u8], from: usize, needle: u8) -> usize {
    text[from..]
        .iter()
        .position(|&ch| ch == needle)
        .map_or(text.len(), |i| from + i)
}

fn token_end(text: &[u8], start: usize) -> usize {
    text[start..]
        .iter()
        .position(|&ch| is_delimiter(ch))
        .map_or(text.len(), |i| start + i)
}

/// Checks that every token of the mainline is a move, a move number, an
/// annotation or a result.
///
/// The tokenizer of `pgn_reader` silently drops tokens it cannot read,
/// so a garbled move would otherwise go unnoticed and the rest of the
/// game would be replayed out of order.
pub(crate) fn check_movetext(game: &[u8]) -> Result<(), DecodeError> {
    let text = movetext(game);
    let mut depth = 0usize;
    let mut ply = 0;
    let mut i = 0;

    while i < text.len() {
        let ch = text[i];
        match ch {
            b'{' => i = find(text, i, b'}') + 1,
            b';' => i = find(text, i, b'\n'),
            b'%' if i == 0 || text[i - 1] == b'\n' => i = find(text, i, b'\n'),
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'!' | b'?' => i += 1,
            _ if ch.is_ascii_whitespace() => i += 1,
            _ => {
                let end = token_end(text, i + 1);
                let token = &text[i..end];
                if depth == 0 {
                    let readable = match ch {
                        b'$' => Nag::from_ascii(token).is_ok(),
                        _ if ch > b'9' => SanPlus::from_ascii(token).is_ok(),
                        _ => true,
                    };
                    if !readable {
                        return Err(DecodeError::Token {
                            ply,
                            token: String::from_utf8_lossy(token).into_owned(),
                        });
                    }
                    if ch > b'9' {
                        ply += 1;
                    }
                }
                i = end;
            }
        }
    }

    Ok(())
}
