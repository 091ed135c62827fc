//! Project materializer.
//!
//! Renders the six artifacts for a config and a credential pair, then
//! writes them under `<output>/<project.name>/`. Rendering happens up
//! front, so a template problem never leaves a partial project behind.
//! Writes are atomic per file but not as a batch: if the fourth write
//! fails, the first three stay on disk.
//!
//! ```no_run
//! use std::path::Path;
//! use wpstack::project::ScaffoldConfig;
//! use wpstack::scaffold::Scaffold;
//! use wpstack::secrets;
//!
//! let config = ScaffoldConfig::default();
//! let pair = secrets::generate_pair(&config.credentials)?;
//! let report = Scaffold::new(Path::new("."), &config).create_project(&pair)?;
//! assert_eq!(report.artifacts.len(), 6);
//! # Ok::<(), wpstack::ScaffoldError>(())
//! ```

mod artifact;
pub mod compose;
pub mod templates;
pub mod writer;

pub use artifact::{ArtifactKind, WrittenArtifact};

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::project::ScaffoldConfig;
use crate::secrets::CredentialPair;

/// One artifact, rendered and ready to write.
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    /// Path relative to the project root
    pub path: PathBuf,
    content: Zeroizing<String>,
}

impl RenderedArtifact {
    pub fn content(&self) -> &str {
        &self.content
    }

    fn mode(&self) -> u32 {
        if self.kind.is_secret() {
            writer::SECRET_MODE
        } else {
            writer::PUBLIC_MODE
        }
    }
}

impl std::fmt::Debug for RenderedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedArtifact")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Outcome of a scaffold run
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub project_root: PathBuf,
    pub dry_run: bool,
    pub artifacts: Vec<WrittenArtifact>,
    /// Variable names the root and app credentials are bound to in `.env`
    pub root_env: String,
    pub app_env: String,
    pub generated_at: DateTime<Local>,
}

impl ScaffoldReport {
    pub fn path_of(&self, kind: ArtifactKind) -> Option<PathBuf> {
        self.artifacts
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| self.project_root.join(&a.path))
    }
}

pub struct Scaffold<'a> {
    config: &'a ScaffoldConfig,
    root: PathBuf,
    dry_run: bool,
}

impl<'a> Scaffold<'a> {
    /// Materializer for `<output>/<config.project.name>/`
    pub fn new(output: impl AsRef<Path>, config: &'a ScaffoldConfig) -> Self {
        Self {
            root: paths::project_root(output.as_ref(), config),
            config,
            dry_run: false,
        }
    }

    /// Render and report without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Render every artifact in write order.
    pub fn render(&self, pair: &CredentialPair) -> Result<Vec<RenderedArtifact>> {
        let generated_on = Local::now().format("%Y-%m-%d").to_string();

        ArtifactKind::ALL
            .into_iter()
            .map(|kind| -> Result<RenderedArtifact> {
                let content = match kind {
                    ArtifactKind::Compose => Zeroizing::new(compose::render(self.config)?),
                    ArtifactKind::NginxConfig => Zeroizing::new(templates::nginx(self.config)?),
                    ArtifactKind::PhpConfig => Zeroizing::new(templates::php(self.config)?),
                    ArtifactKind::EnvFile => {
                        let registry = pair.registry(&self.config.credentials);
                        debug!(vars = ?registry.names().collect::<Vec<_>>(), "binding credentials");
                        registry.render()
                    }
                    ArtifactKind::GitIgnore => {
                        Zeroizing::new(templates::gitignore(self.config)?)
                    }
                    ArtifactKind::Readme => {
                        Zeroizing::new(templates::readme(self.config, &generated_on)?)
                    }
                };
                debug!(artifact = %kind, bytes = content.len(), "rendered");
                Ok(RenderedArtifact {
                    kind,
                    path: self.config.artifacts.path_for(kind).to_path_buf(),
                    content,
                })
            })
            .collect()
    }

    /// Create the project directory (it may already exist) and write all
    /// six artifacts, overwriting any previous versions.
    pub fn create_project(&self, pair: &CredentialPair) -> Result<ScaffoldReport> {
        let rendered = self.render(pair)?;

        if !self.dry_run {
            std::fs::create_dir_all(&self.root).map_err(|source| ScaffoldError::CreateDir {
                path: self.root.clone(),
                source,
            })?;
            info!(root = %self.root.display(), "project directory ready");
        }

        let mut artifacts = Vec::with_capacity(rendered.len());
        for artifact in &rendered {
            if !self.dry_run {
                let target = paths::artifact_path(&self.root, self.config, artifact.kind);
                writer::write_atomic(&target, artifact.content().as_bytes(), artifact.mode())?;
                info!(artifact = %artifact.kind, path = %target.display(), "wrote");
            }
            artifacts.push(WrittenArtifact {
                kind: artifact.kind,
                path: artifact.path.clone(),
                bytes: artifact.content().len(),
            });
        }

        Ok(ScaffoldReport {
            project_root: self.root.clone(),
            dry_run: self.dry_run,
            artifacts,
            root_env: self.config.credentials.root_env.clone(),
            app_env: self.config.credentials.app_env.clone(),
            generated_at: Local::now(),
        })
    }
}
