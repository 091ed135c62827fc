//! Database credentials for the generated stack.
//!
//! Two passwords per run, one for the MySQL root account and one for the
//! WordPress application user. Both come straight from the OS CSPRNG via
//! rejection sampling, so each character is uniform over the alphabet and
//! the length is always exact.
//!
//! ```text
//! OsRng ──bytes──▶ Alphabet::map_byte ──accept/reject──▶ Credential (24 chars)
//!                                                              │
//!                      SecretsRegistry { NAME → Credential } ◀─┘
//!                                   │
//!                                   ▼
//!                                 .env
//! ```
//!
//! # Example
//!
//! ```no_run
//! use wpstack::project::ScaffoldConfig;
//! use wpstack::secrets;
//!
//! let config = ScaffoldConfig::default();
//! let pair = secrets::generate_pair(&config.credentials)?;
//! assert_eq!(pair.root.len(), 24);
//! # Ok::<(), wpstack::ScaffoldError>(())
//! ```

mod alphabet;
mod generator;
mod registry;

pub use self::alphabet::{Alphabet, ALPHANUMERIC};
pub use self::generator::{Credential, CredentialGenerator, MAX_LENGTH};
pub use self::registry::{is_valid_env_name, SecretsRegistry};

use rand::TryCryptoRng;
use tracing::debug;

use crate::error::{Result, ScaffoldError};
use crate::project::CredentialsSection;

/// Attempts at drawing an application password distinct from the root one
const MAX_PAIR_ATTEMPTS: usize = 8;

/// The two credentials of one scaffold run.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    /// MySQL root password
    pub root: Credential,
    /// WordPress database user password
    pub app: Credential,
}

impl CredentialPair {
    /// Bind both credentials to their configured variable names.
    pub fn registry<'a>(&'a self, names: &'a CredentialsSection) -> SecretsRegistry<'a> {
        let mut registry = SecretsRegistry::new();
        registry.insert(&names.root_env, &self.root);
        registry.insert(&names.app_env, &self.app);
        registry
    }
}

/// Generate the root and application credentials from the OS random source.
pub fn generate_pair(settings: &CredentialsSection) -> Result<CredentialPair> {
    let alphabet = Alphabet::new(&settings.alphabet)?;
    let mut generator = CredentialGenerator::from_os(alphabet, settings.length);
    generate_pair_with(&mut generator)
}

/// Generate a pair from any generator. Each credential is a separate draw;
/// nothing is derived from or shared with the other.
pub fn generate_pair_with<R: TryCryptoRng>(
    generator: &mut CredentialGenerator<R>,
) -> Result<CredentialPair> {
    let root = generator.generate()?;

    for attempt in 1..=MAX_PAIR_ATTEMPTS {
        let app = generator.generate()?;
        if app != root {
            debug!(length = generator.length(), attempt, "generated credential pair");
            return Ok(CredentialPair { root, app });
        }
    }

    Err(ScaffoldError::RandomSource {
        message: format!(
            "{MAX_PAIR_ATTEMPTS} draws in a row repeated the root credential; \
             the alphabet or length is too small to yield distinct passwords"
        ),
    })
}
