//! Sets of piece symbols.

use std::{fmt, ops, str::FromStr};

use crate::errors::Error;

/// A set of ASCII graphic characters, such as the piece letters
/// `kKpP`, stored as a 128-bit mask.
///
/// Characters outside of ASCII can never be members. This is what
/// placement fields need: any other character in a placement field is
/// garbage and should never be covered by an alphabet.
///
/// # Examples
///
/// ```
/// use endgame_filter::SymbolSet;
///
/// let kings_and_pawns: SymbolSet = "kKpP".parse()?;
/// assert!(kings_and_pawns.contains('K'));
/// assert!(!kings_and_pawns.contains('Q'));
/// assert_eq!(kings_and_pawns.len(), 4);
/// # Ok::<_, endgame_filter::Error>(())
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SymbolSet(u128);

impl SymbolSet {
    /// The empty set.
    pub const EMPTY: SymbolSet = SymbolSet(0);

    /// Both kings and both sides' pawns.
    pub const KINGS_AND_PAWNS: SymbolSet = SymbolSet::from_bytes(b"kKpP");

    /// All twelve piece letters.
    pub const ALL_PIECES: SymbolSet = SymbolSet::from_bytes(b"pnbrqkPNBRQK");

    const fn from_bytes(bytes: &[u8]) -> SymbolSet {
        let mut mask = 0;
        let mut i = 0;
        while i < bytes.len() {
            mask |= 1 << bytes[i];
            i += 1;
        }
        SymbolSet(mask)
    }

    /// Parses a set from its symbols, like `b"kKpP"`. Duplicates are
    /// allowed. Every byte must be printable ASCII other than space.
    pub fn from_ascii(s: &[u8]) -> Result<SymbolSet, Error> {
        let mut set = SymbolSet::EMPTY;
        for &ch in s {
            if !ch.is_ascii_graphic() {
                return Err(Error::Parameter {
                    name: "pieces",
                    reason: format!("invalid piece symbol {:?}", char::from(ch)),
                });
            }
            set.0 |= 1 << ch;
        }
        Ok(set)
    }

    #[inline]
    pub const fn contains(self, ch: char) -> bool {
        (ch as u32) < 128 && self.0 & (1 << ch as u32) != 0
    }

    /// Adds a symbol. Returns `false` if it cannot be represented.
    #[inline]
    pub fn insert(&mut self, ch: char) -> bool {
        if ch.is_ascii() {
            self.0 |= 1 << ch as u32;
            true
        } else {
            false
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_subset(self, other: SymbolSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates over the symbols in ASCII order.
    pub fn iter(self) -> impl Iterator<Item = char> {
        (0u8..128)
            .filter(move |&b| self.0 & (1 << b) != 0)
            .map(char::from)
    }
}

impl ops::BitOr for SymbolSet {
    type Output = SymbolSet;

    fn bitor(self, rhs: SymbolSet) -> SymbolSet {
        SymbolSet(self.0 | rhs.0)
    }
}

impl ops::BitAnd for SymbolSet {
    type Output = SymbolSet;

    fn bitand(self, rhs: SymbolSet) -> SymbolSet {
        SymbolSet(self.0 & rhs.0)
    }
}

impl FromIterator<char> for SymbolSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> SymbolSet {
        let mut set = SymbolSet::EMPTY;
        for ch in iter {
            set.insert(ch);
        }
        set
    }
}

impl FromStr for SymbolSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<SymbolSet, Error> {
        SymbolSet::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|ch| fmt::Write::write_char(f, ch))
    }
}

impl fmt::Debug for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SymbolSet(-)")
        } else {
            write!(f, "SymbolSet({self})")
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SymbolSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SymbolSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<SymbolSet, D::Error> {
        let s = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
