//! Character subsets selectable by bitmask.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

const LOWERCASE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT_CHARS: &[u8] = b"0123456789";
const SYMBOL_CHARS: &[u8] = b"!@#$%^&*()-_=+[]{}|;:',.<>?/`~";

/// Bitmask over the four character subsets.
///
/// A mask of zero selects every subset. Bits outside the four known subsets
/// select nothing, so a mask made only of unknown bits resolves to an empty pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Charset(u32);

impl Charset {
    pub const LOWERCASE: Charset = Charset(1 << 0);
    pub const UPPERCASE: Charset = Charset(1 << 1);
    pub const DIGITS: Charset = Charset(1 << 2);
    pub const SYMBOLS: Charset = Charset(1 << 3);

    pub const LETTERS: Charset = Charset(Self::LOWERCASE.0 | Self::UPPERCASE.0);
    pub const ALL: Charset =
        Charset(Self::LOWERCASE.0 | Self::UPPERCASE.0 | Self::DIGITS.0 | Self::SYMBOLS.0);

    /// Wrap raw bits without discarding unknown ones.
    pub const fn from_bits(bits: u32) -> Self {
        Charset(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Charset) -> bool {
        self.0 & other.0 == other.0
    }

    /// Concatenated character pool in fixed order: lower, upper, digits, symbols.
    pub fn pool(self) -> Vec<u8> {
        let mask = if self.0 == 0 { Self::ALL } else { self };
        let mut pool = Vec::with_capacity(96);
        for (subset, chars) in [
            (Self::LOWERCASE, LOWERCASE_CHARS),
            (Self::UPPERCASE, UPPERCASE_CHARS),
            (Self::DIGITS, DIGIT_CHARS),
            (Self::SYMBOLS, SYMBOL_CHARS),
        ] {
            if mask.contains(subset) {
                pool.extend_from_slice(chars);
            }
        }
        pool
    }
}

impl BitOr for Charset {
    type Output = Charset;
    fn bitor(self, rhs: Charset) -> Charset {
        Charset(self.0 | rhs.0)
    }
}

impl BitOrAssign for Charset {
    fn bitor_assign(&mut self, rhs: Charset) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 || *self == Self::ALL {
            return f.write_str("all");
        }
        let names: Vec<&str> = [
            (Self::LOWERCASE, "lower"),
            (Self::UPPERCASE, "upper"),
            (Self::DIGITS, "digits"),
            (Self::SYMBOLS, "symbols"),
        ]
        .into_iter()
        .filter(|(subset, _)| self.contains(*subset))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for Charset {
    type Err = String;

    /// Comma-separated subset names, e.g. `lower,digits`, `letters` or `all`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Charset::default();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            set |= match part.to_ascii_lowercase().as_str() {
                "lower" | "lowercase" => Charset::LOWERCASE,
                "upper" | "uppercase" => Charset::UPPERCASE,
                "digits" | "numbers" => Charset::DIGITS,
                "symbols" => Charset::SYMBOLS,
                "letters" | "alpha" => Charset::LETTERS,
                "all" => Charset::ALL,
                other => return Err(format!("unknown charset: '{other}'")),
            };
        }
        if set.bits() == 0 {
            return Err(format!("empty charset selection: '{s}'"));
        }
        Ok(set)
    }
}
