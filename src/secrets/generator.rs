//! Credential generation by rejection sampling over OS randomness.

use rand::rngs::OsRng;
use rand::TryCryptoRng;
use std::fmt;
use zeroize::Zeroizing;

use super::alphabet::Alphabet;
use crate::error::{Result, ScaffoldError};

/// Longest credential the generator will produce
pub const MAX_LENGTH: usize = 4096;

/// Bytes requested from the random source per draw
const BLOCK_SIZE: usize = 32;

/// Extra draws allowed beyond one per output character before giving up
/// on a source that keeps producing rejected bytes.
const SPARE_DRAWS: usize = 16;

/// A generated secret. The buffer is wiped on drop and `Debug` never
/// prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// The secret value, for writing into an artifact.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars redacted>)", self.0.len())
    }
}

/// Produces fixed-length credentials from a cryptographic random source.
pub struct CredentialGenerator<R> {
    rng: R,
    alphabet: Alphabet,
    length: usize,
}

impl CredentialGenerator<OsRng> {
    /// Generator backed by the operating system CSPRNG.
    pub fn from_os(alphabet: Alphabet, length: usize) -> Self {
        Self::with_rng(OsRng, alphabet, length)
    }
}

impl<R: TryCryptoRng> CredentialGenerator<R> {
    pub fn with_rng(rng: R, alphabet: Alphabet, length: usize) -> Self {
        Self {
            rng,
            alphabet,
            length,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draw exactly `length` symbols.
    ///
    /// Fails if the random source errors or keeps yielding only rejected
    /// bytes; never falls back to a weaker source and never returns a
    /// short credential.
    pub fn generate(&mut self) -> Result<Credential> {
        if self.length > MAX_LENGTH {
            return Err(ScaffoldError::invalid_config(format!(
                "credential length {} exceeds the maximum of {MAX_LENGTH}",
                self.length
            )));
        }

        let mut value = Zeroizing::new(String::with_capacity(self.length));
        let mut block = Zeroizing::new([0u8; BLOCK_SIZE]);
        let max_draws = self.length.saturating_add(SPARE_DRAWS);
        let mut draws = 0;

        while value.len() < self.length {
            if draws == max_draws {
                return Err(ScaffoldError::RandomSource {
                    message: format!(
                        "no usable bytes after {draws} draws of {BLOCK_SIZE} bytes"
                    ),
                });
            }
            draws += 1;

            self.rng
                .try_fill_bytes(&mut block[..])
                .map_err(|e| ScaffoldError::RandomSource {
                    message: e.to_string(),
                })?;

            for symbol in block.iter().filter_map(|&b| self.alphabet.map_byte(b)) {
                if value.len() == self.length {
                    break;
                }
                value.push(symbol);
            }
        }

        Ok(Credential(value))
    }
}
