//! Scaffold a WordPress deployment
//!
//! This module follows the dependable-rust pattern:
//! - Public interface (this file): options and a single entry point
//! - Internal implementation: orchestration and output in internal.rs
//!
//! # Process
//!
//! 1. **Configuration**: built-in defaults, optionally overridden by TOML
//! 2. **Preflight**: every required tool must resolve on `PATH`
//! 3. **Credentials**: root and application passwords from the OS CSPRNG
//! 4. **Materialize**: project directory plus six artifacts
//! 5. **Summary**: created files, credentials and next steps
//!
//! # Errors
//!
//! Returns an error if:
//! - The config file cannot be read, parsed or validated
//! - A required tool is missing (nothing is written)
//! - The random source fails
//! - The project directory or an artifact cannot be written (files written
//!   before the failure stay on disk)

mod internal;

use anyhow::Result;
use std::path::PathBuf;

/// Options for one scaffold run
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// TOML file overriding the built-in defaults
    pub config: Option<PathBuf>,
    /// Directory the project directory is created in
    pub output: PathBuf,
    /// Render and report without writing
    pub dry_run: bool,
    /// Print the summary as JSON
    pub json: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            config: None,
            output: PathBuf::from("."),
            dry_run: false,
            json: false,
        }
    }
}

/// Execute the scaffold command
pub fn execute(options: &InitOptions) -> Result<()> {
    internal::execute_init(options)
}
