//! Project module - scaffold configuration
//!
//! One `ScaffoldConfig` carries every fixed value of a run: the project
//! directory name, credential shape, required tools, artifact paths,
//! container images and PHP limits. The defaults describe the stock
//! WordPress stack; a TOML file can override any section.
//!
//! # Example
//!
//! ```no_run
//! use wpstack::project;
//! use std::path::Path;
//!
//! let config = project::load(Path::new("wpstack.toml"))?;
//! println!("Project: {}", config.project.name);
//! println!("Password length: {}", config.credentials.length);
//! # Ok::<(), wpstack::ScaffoldError>(())
//! ```

mod internal;

use std::path::Path;

use crate::error::Result;

// Re-export config types
pub use internal::{
    ArtifactsSection, CredentialsSection, DatabaseSection, ImagesSection, PhpSection,
    PreflightSection, ProjectSection, ProxySection, ScaffoldConfig,
};

/// Load a scaffold config from a TOML file and validate it.
///
/// Missing sections and keys take their defaults.
pub fn load(path: &Path) -> Result<ScaffoldConfig> {
    internal::load(path)
}

/// Parse and validate a config from TOML text.
pub fn parse(contents: &str) -> Result<ScaffoldConfig> {
    let config = internal::parse(contents)
        .map_err(|e| crate::error::ScaffoldError::invalid_config(e.to_string()))?;
    internal::validate(&config)?;
    Ok(config)
}

/// Load from `path` when given, otherwise use the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ScaffoldConfig> {
    match path {
        Some(path) => load(path),
        None => Ok(ScaffoldConfig::default()),
    }
}

/// Check a config for values the scaffold cannot honor
pub fn validate(config: &ScaffoldConfig) -> Result<()> {
    internal::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config, ScaffoldConfig::default());
    }

    #[test]
    fn test_parse_validates() {
        assert!(parse("[project]\nname = \"blog\"\n").is_ok());
        assert!(parse("[project]\nname = \"a/b\"\n").is_err());
        assert!(parse("[credentials]\nlength = \"long\"\n").is_err());
    }
}
