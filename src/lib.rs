//! Scaffold a Docker Compose WordPress deployment.
//!
//! A run checks that the container tooling is installed, generates two
//! database passwords and writes a ready-to-start project:
//! `docker-compose.yml`, an Nginx server block, a PHP ini override, `.env`,
//! `.gitignore` and a README.

pub mod error;
pub mod paths;
pub mod preflight;
pub mod project;
pub mod scaffold;
pub mod secrets;

// Re-export commonly used types
pub use error::{Result, ScaffoldError};
pub use project::ScaffoldConfig;
pub use scaffold::{ArtifactKind, Scaffold, ScaffoldReport};
pub use secrets::{Credential, CredentialPair};
