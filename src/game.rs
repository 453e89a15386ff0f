use std::{fmt, num::NonZeroU32};

use shakmaty::{Color, Outcome};

/// Access to the position reached by a ply.
pub trait EncodedPosition {
    /// The position as FEN. Only the placement field is read by the
    /// classifier.
    fn fen(&self) -> &str;
}

impl EncodedPosition for str {
    fn fen(&self) -> &str {
        self
    }
}

impl EncodedPosition for String {
    fn fen(&self) -> &str {
        self
    }
}

impl<T: EncodedPosition + ?Sized> EncodedPosition for &T {
    fn fen(&self) -> &str {
        (**self).fen()
    }
}

/// A half-move and the position right after it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ply {
    san: String,
    fen: String,
}

impl Ply {
    pub fn new(san: impl Into<String>, fen: impl Into<String>) -> Ply {
        Ply {
            san: san.into(),
            fen: fen.into(),
        }
    }

    /// The move as it was written in the source.
    pub fn san(&self) -> &str {
        &self.san
    }
}

impl EncodedPosition for Ply {
    fn fen(&self) -> &str {
        &self.fen
    }
}

/// A game: its tag pairs and the mainline history.
///
/// Displays as PGN.
#[derive(Clone, Debug)]
pub struct GameRecord {
    tags: Vec<(String, String)>,
    plies: Vec<Ply>,
    outcome: Option<Outcome>,
    first_turn: Color,
    first_fullmove: NonZeroU32,
}

impl Default for GameRecord {
    fn default() -> GameRecord {
        GameRecord::new()
    }
}

impl GameRecord {
    /// An empty game from the standard starting position.
    pub fn new() -> GameRecord {
        GameRecord {
            tags: Vec::new(),
            plies: Vec::new(),
            outcome: None,
            first_turn: Color::White,
            first_fullmove: NonZeroU32::MIN,
        }
    }

    /// Tag pairs in the order they were read.
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Value of the first tag named `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn push_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.push((name.into(), value.into()));
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn push_ply(&mut self, ply: Ply) {
        self.plies.push(ply);
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    /// Sets side to move and move number of the first ply, for games
    /// from a custom starting position.
    pub fn set_first_move(&mut self, turn: Color, fullmove: NonZeroU32) {
        self.first_turn = turn;
        self.first_fullmove = fullmove;
    }
}

const MAX_LINE: usize = 80;

struct LineWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    column: usize,
}

impl LineWriter<'_, '_> {
    fn token(&mut self, token: &str) -> fmt::Result {
        if self.column > 0 {
            if self.column + 1 + token.len() > MAX_LINE {
                self.f.write_str("\n")?;
                self.column = 0;
            } else {
                self.f.write_str(" ")?;
                self.column += 1;
            }
        }
        self.f.write_str(token)?;
        self.column += token.len();
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for ch in value.chars() {
        if ch == '\\' || ch == '"' {
            f.write_str("\\")?;
        }
        fmt::Write::write_char(f, ch)?;
    }
    Ok(())
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.tags() {
            write!(f, "[{name} \"")?;
            write_escaped(f, value)?;
            f.write_str("\"]\n")?;
        }
        if !self.tags().is_empty() {
            f.write_str("\n")?;
        }

        let mut out = LineWriter { f, column: 0 };
        let mut turn = self.first_turn;
        let mut fullmove = self.first_fullmove.get();
        for (i, ply) in self.plies.iter().enumerate() {
            match turn {
                Color::White => out.token(&format!("{fullmove}."))?,
                Color::Black if i == 0 => out.token(&format!("{fullmove}..."))?,
                Color::Black => (),
            }
            out.token(ply.san())?;
            if turn == Color::Black {
                fullmove += 1;
            }
            turn = !turn;
        }
        match &self.outcome {
            Some(outcome) => out.token(&outcome.to_string())?,
            None => out.token("*")?,
        }
        out.f.write_str("\n")
    }
}
