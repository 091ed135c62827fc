//! Credential alphabet and byte-to-symbol mapping.

use crate::error::{Result, ScaffoldError};

/// Default password alphabet: `[A-Za-z0-9]`
pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Symbols that would need escaping in `.env` files or shells
const FORBIDDEN: &[u8] = b"'\"\\`";

/// A validated set of distinct printable ASCII symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Build an alphabet from a string of symbols.
    ///
    /// Rejects empty input, non-printable or non-ASCII characters, quotes,
    /// backslashes and duplicates.
    pub fn new(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ScaffoldError::invalid_config(
                "credentials.alphabet cannot be empty",
            ));
        }

        let mut seen = [false; 128];
        for c in symbols.chars() {
            if !c.is_ascii_graphic() || FORBIDDEN.contains(&(c as u8)) {
                return Err(ScaffoldError::invalid_config(format!(
                    "credentials.alphabet contains unsupported character {c:?}"
                )));
            }
            let slot = &mut seen[c as usize];
            if *slot {
                return Err(ScaffoldError::invalid_config(format!(
                    "credentials.alphabet contains '{c}' more than once"
                )));
            }
            *slot = true;
        }

        Ok(Self {
            symbols: symbols.as_bytes().to_vec(),
        })
    }

    pub fn alphanumeric() -> Self {
        Self {
            symbols: ALPHANUMERIC.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols.contains(&(c as u8))
    }

    /// Map a random byte onto the alphabet, or reject it.
    ///
    /// Only bytes below the largest multiple of `len` that fits in 256 are
    /// accepted, so every symbol is equally likely.
    pub(crate) fn map_byte(&self, byte: u8) -> Option<char> {
        let n = self.symbols.len() as u16;
        let bound = 256 - (256 % n);
        let byte = u16::from(byte);
        (byte < bound).then(|| char::from(self.symbols[usize::from(byte % n)]))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::alphanumeric()
    }
}
