//! Internal implementation for project module
//!
//! Scaffold configuration schema, defaults, loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::scaffold::ArtifactKind;
use crate::secrets::{self, Alphabet};

/// The only file compose reads `${NAME}` values from
const COMPOSE_ENV_FILE: &str = ".env";

// =============================================================================
// Config Types
// =============================================================================

/// Everything a scaffold run needs, in one place.
/// All sections are optional in TOML and fall back to the built-in stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub credentials: CredentialsSection,
    #[serde(default)]
    pub preflight: PreflightSection,
    #[serde(default)]
    pub artifacts: ArtifactsSection,
    #[serde(default)]
    pub images: ImagesSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub php: PhpSection,
    #[serde(default)]
    pub proxy: ProxySection,
}

#[cfg(test)]
impl ScaffoldConfig {
    /// Create config with a custom project directory name
    pub(crate) fn with_name(name: impl Into<String>) -> Self {
        Self {
            project: ProjectSection { name: name.into() },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Directory created to hold the generated stack
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    "wordpress-site".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsSection {
    /// Characters per generated password
    #[serde(default = "default_length")]
    pub length: usize,
    /// Symbols a password may contain
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Variable holding the database root password in `.env`
    #[serde(default = "default_root_env")]
    pub root_env: String,
    /// Variable holding the application database password in `.env`
    #[serde(default = "default_app_env")]
    pub app_env: String,
}

fn default_length() -> usize {
    24
}
fn default_alphabet() -> String {
    secrets::ALPHANUMERIC.to_string()
}
fn default_root_env() -> String {
    "MYSQL_ROOT_PASSWORD".to_string()
}
fn default_app_env() -> String {
    "MYSQL_PASSWORD".to_string()
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            length: default_length(),
            alphabet: default_alphabet(),
            root_env: default_root_env(),
            app_env: default_app_env(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightSection {
    /// Executables that must resolve on PATH before anything is written
    #[serde(default = "default_tools")]
    pub tools: Vec<String>,
}

fn default_tools() -> Vec<String> {
    vec!["docker".to_string(), "docker-compose".to_string()]
}

impl Default for PreflightSection {
    fn default() -> Self {
        Self {
            tools: default_tools(),
        }
    }
}

/// Output paths, relative to the project directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsSection {
    #[serde(default = "default_compose_path")]
    pub compose: PathBuf,
    #[serde(default = "default_nginx_path")]
    pub nginx: PathBuf,
    #[serde(default = "default_php_path")]
    pub php: PathBuf,
    #[serde(default = "default_env_path")]
    pub env: PathBuf,
    #[serde(default = "default_gitignore_path")]
    pub gitignore: PathBuf,
    #[serde(default = "default_readme_path")]
    pub readme: PathBuf,
}

fn default_compose_path() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}
fn default_nginx_path() -> PathBuf {
    PathBuf::from("nginx/default.conf")
}
fn default_php_path() -> PathBuf {
    PathBuf::from("php/uploads.ini")
}
fn default_env_path() -> PathBuf {
    PathBuf::from(".env")
}
fn default_gitignore_path() -> PathBuf {
    PathBuf::from(".gitignore")
}
fn default_readme_path() -> PathBuf {
    PathBuf::from("README.md")
}

impl Default for ArtifactsSection {
    fn default() -> Self {
        Self {
            compose: default_compose_path(),
            nginx: default_nginx_path(),
            php: default_php_path(),
            env: default_env_path(),
            gitignore: default_gitignore_path(),
            readme: default_readme_path(),
        }
    }
}

impl ArtifactsSection {
    /// Relative output path for an artifact
    pub fn path_for(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Compose => &self.compose,
            ArtifactKind::NginxConfig => &self.nginx,
            ArtifactKind::PhpConfig => &self.php,
            ArtifactKind::EnvFile => &self.env,
            ArtifactKind::GitIgnore => &self.gitignore,
            ArtifactKind::Readme => &self.readme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesSection {
    #[serde(default = "default_database_image")]
    pub database: String,
    #[serde(default = "default_wordpress_image")]
    pub wordpress: String,
    #[serde(default = "default_proxy_image")]
    pub proxy: String,
}

fn default_database_image() -> String {
    "mysql:8.0".to_string()
}
fn default_wordpress_image() -> String {
    "wordpress:php8.2-fpm".to_string()
}
fn default_proxy_image() -> String {
    "nginx:alpine".to_string()
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            database: default_database_image(),
            wordpress: default_wordpress_image(),
            proxy: default_proxy_image(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_user")]
    pub user: String,
}

fn default_db_name() -> String {
    "wordpress".to_string()
}
fn default_db_user() -> String {
    "wordpress".to_string()
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            name: default_db_name(),
            user: default_db_user(),
        }
    }
}

/// PHP runtime limits written to the ini override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhpSection {
    #[serde(default = "default_upload_size")]
    pub upload_max_filesize: String,
    #[serde(default = "default_upload_size")]
    pub post_max_size: String,
    /// Seconds
    #[serde(default = "default_max_execution_time")]
    pub max_execution_time: u32,
    #[serde(default = "default_memory_limit")]
    pub memory_limit: String,
}

fn default_upload_size() -> String {
    "64M".to_string()
}
fn default_max_execution_time() -> u32 {
    300
}
fn default_memory_limit() -> String {
    "256M".to_string()
}

impl Default for PhpSection {
    fn default() -> Self {
        Self {
            upload_max_filesize: default_upload_size(),
            post_max_size: default_upload_size(),
            max_execution_time: default_max_execution_time(),
            memory_limit: default_memory_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxySection {
    /// Host port published by the reverse proxy
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// PHP-FPM port inside the compose network
    #[serde(default = "default_fastcgi_port")]
    pub fastcgi_port: u16,
}

fn default_http_port() -> u16 {
    80
}
fn default_fastcgi_port() -> u16 {
    9000
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            fastcgi_port: default_fastcgi_port(),
        }
    }
}

// =============================================================================
// Load
// =============================================================================

/// Load and validate a scaffold config from a TOML file
pub fn load(path: &Path) -> Result<ScaffoldConfig> {
    let contents = fs::read_to_string(path).map_err(|source| ScaffoldError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse(&contents).map_err(|source| ScaffoldError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;

    validate(&config)?;
    Ok(config)
}

pub fn parse(contents: &str) -> std::result::Result<ScaffoldConfig, toml::de::Error> {
    toml::from_str(contents)
}

// =============================================================================
// Validation
// =============================================================================

pub fn validate(config: &ScaffoldConfig) -> Result<()> {
    validate_project_name(&config.project.name)?;
    validate_credentials(&config.credentials)?;

    if config.preflight.tools.is_empty() {
        return Err(ScaffoldError::invalid_config(
            "preflight.tools must name at least one tool",
        ));
    }
    if config.preflight.tools.iter().any(|t| t.trim().is_empty()) {
        return Err(ScaffoldError::invalid_config(
            "preflight.tools must not contain empty names",
        ));
    }

    validate_artifact_paths(&config.artifacts)?;

    for (key, value) in [
        ("database.name", &config.database.name),
        ("database.user", &config.database.user),
        ("php.upload_max_filesize", &config.php.upload_max_filesize),
        ("php.post_max_size", &config.php.post_max_size),
        ("php.memory_limit", &config.php.memory_limit),
    ] {
        if value.trim().is_empty() {
            return Err(ScaffoldError::invalid_config(format!(
                "{key} must not be empty"
            )));
        }
    }

    if config.php.max_execution_time == 0 {
        return Err(ScaffoldError::invalid_config(
            "php.max_execution_time must be greater than zero",
        ));
    }

    Ok(())
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ScaffoldError::invalid_config("project.name cannot be empty"));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::invalid_config(format!(
            "project.name '{name}' must be a single directory name"
        )));
    }
    Ok(())
}

fn validate_credentials(creds: &CredentialsSection) -> Result<()> {
    if creds.length == 0 {
        return Err(ScaffoldError::invalid_config(
            "credentials.length must be greater than zero",
        ));
    }
    if creds.length > secrets::MAX_LENGTH {
        return Err(ScaffoldError::invalid_config(format!(
            "credentials.length {} exceeds the maximum of {}",
            creds.length,
            secrets::MAX_LENGTH
        )));
    }

    Alphabet::new(&creds.alphabet)?;

    for env in [&creds.root_env, &creds.app_env] {
        if !secrets::is_valid_env_name(env) {
            return Err(ScaffoldError::invalid_config(format!(
                "'{env}' is not a valid environment variable name (use e.g. MYSQL_PASSWORD)"
            )));
        }
    }

    if creds.root_env == creds.app_env {
        return Err(ScaffoldError::invalid_config(
            "credentials.root_env and credentials.app_env must differ",
        ));
    }

    Ok(())
}

fn validate_artifact_paths(artifacts: &ArtifactsSection) -> Result<()> {
    let mut seen = HashSet::new();

    for kind in ArtifactKind::ALL {
        let path = artifacts.path_for(kind);

        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.as_os_str().is_empty() || escapes {
            return Err(ScaffoldError::invalid_config(format!(
                "artifacts.{}: '{}' must be a relative path inside the project",
                kind.key(),
                path.display()
            )));
        }

        if !seen.insert(path) {
            return Err(ScaffoldError::invalid_config(format!(
                "artifacts.{}: '{}' is used by more than one artifact",
                kind.key(),
                path.display()
            )));
        }
    }

    // Compose resolves bind mounts and `${NAME}` references from the
    // directory holding docker-compose.yml, reading variables only from
    // `.env` in that directory.
    let depth = artifacts
        .compose
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();
    if depth != 1 {
        return Err(ScaffoldError::invalid_config(format!(
            "artifacts.compose: '{}' must be a file at the project root",
            artifacts.compose.display()
        )));
    }
    if paths::portable(&artifacts.env) != COMPOSE_ENV_FILE {
        return Err(ScaffoldError::invalid_config(format!(
            "artifacts.env: '{}' must be '{COMPOSE_ENV_FILE}' next to the compose file",
            artifacts.env.display()
        )));
    }

    Ok(())
}
