//! The six files a scaffold run produces.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which generated file an artifact is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// docker-compose.yml: db, wordpress and nginx services
    Compose,
    /// Reverse proxy server block
    NginxConfig,
    /// PHP ini override with upload/time/memory limits
    PhpConfig,
    /// `.env` with the generated passwords
    EnvFile,
    /// `.gitignore` keeping the secrets file out of git
    GitIgnore,
    /// Operator documentation
    Readme,
}

impl ArtifactKind {
    /// Every artifact, in write order.
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Compose,
        ArtifactKind::NginxConfig,
        ArtifactKind::PhpConfig,
        ArtifactKind::EnvFile,
        ArtifactKind::GitIgnore,
        ArtifactKind::Readme,
    ];

    /// Key of this artifact in the `[artifacts]` config section
    pub fn key(self) -> &'static str {
        match self {
            ArtifactKind::Compose => "compose",
            ArtifactKind::NginxConfig => "nginx",
            ArtifactKind::PhpConfig => "php",
            ArtifactKind::EnvFile => "env",
            ArtifactKind::GitIgnore => "gitignore",
            ArtifactKind::Readme => "readme",
        }
    }

    /// Whether the content carries credential values
    pub fn is_secret(self) -> bool {
        matches!(self, ArtifactKind::EnvFile)
    }

    pub fn description(self) -> &'static str {
        match self {
            ArtifactKind::Compose => "container orchestration",
            ArtifactKind::NginxConfig => "reverse proxy config",
            ArtifactKind::PhpConfig => "PHP runtime limits",
            ArtifactKind::EnvFile => "database credentials",
            ArtifactKind::GitIgnore => "git ignore list",
            ArtifactKind::Readme => "operations guide",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A file that was (or, in a dry run, would be) written
#[derive(Debug, Clone, Serialize)]
pub struct WrittenArtifact {
    pub kind: ArtifactKind,
    /// Path relative to the project root
    pub path: PathBuf,
    pub bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_has_six_distinct_kinds() {
        let keys: HashSet<_> = ArtifactKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn test_only_env_file_is_secret() {
        let secret: Vec<_> = ArtifactKind::ALL
            .into_iter()
            .filter(|k| k.is_secret())
            .collect();
        assert_eq!(secret, vec![ArtifactKind::EnvFile]);
    }

    #[test]
    fn test_serializes_kebab_case() {
        let json = serde_json::to_string(&ArtifactKind::NginxConfig).unwrap();
        assert_eq!(json, "\"nginx-config\"");
    }
}
