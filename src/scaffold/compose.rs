//! docker-compose.yml model and generation.
//!
//! Three services: `db` (MySQL), `wordpress` (PHP-FPM) and `nginx`
//! (reverse proxy). Passwords are never inlined; the file references
//! `${NAME}` and compose resolves them from `.env`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, ScaffoldError};
use crate::paths::{self, container, volumes};
use crate::project::ScaffoldConfig;
use crate::scaffold::ArtifactKind;

pub const DB_SERVICE: &str = "db";
pub const APP_SERVICE: &str = "wordpress";
pub const PROXY_SERVICE: &str = "nginx";

/// Port MySQL listens on inside the compose network
const MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, Service>,
    #[serde(default)]
    pub volumes: BTreeMap<String, NamedVolume>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,
}

/// Short (`[a, b]`) or long (`{a: {condition: ...}}`) dependency syntax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    Services(Vec<String>),
    Conditions(BTreeMap<String, DependsOnCondition>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependsOnCondition {
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Healthcheck {
    pub test: Vec<String>,
    pub interval: String,
    pub timeout: String,
    pub retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_period: Option<String>,
}

/// Named volume with driver defaults; serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedVolume {}

/// `${NAME}`, resolved by compose from the env file
pub fn env_ref(name: &str) -> String {
    format!("${{{name}}}")
}

impl DependsOn {
    /// Names of every service depended on
    pub fn services(&self) -> Vec<&str> {
        match self {
            DependsOn::Services(list) => list.iter().map(String::as_str).collect(),
            DependsOn::Conditions(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Condition attached to a dependency, if the long syntax is used
    pub fn condition(&self, service: &str) -> Option<&str> {
        match self {
            DependsOn::Services(_) => None,
            DependsOn::Conditions(map) => map.get(service).map(|c| c.condition.as_str()),
        }
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Build the compose model for a config
pub fn build(config: &ScaffoldConfig) -> ComposeFile {
    let mut services = BTreeMap::new();
    services.insert(DB_SERVICE.to_string(), database_service(config));
    services.insert(APP_SERVICE.to_string(), app_service(config));
    services.insert(PROXY_SERVICE.to_string(), proxy_service(config));

    let volumes = [volumes::DB_DATA, volumes::WP_DATA]
        .into_iter()
        .map(|name| (name.to_string(), NamedVolume::default()))
        .collect();

    ComposeFile { services, volumes }
}

/// Render docker-compose.yml
pub fn render(config: &ScaffoldConfig) -> Result<String> {
    let yaml = serde_yaml::to_string(&build(config)).map_err(|e| ScaffoldError::Render {
        artifact: ArtifactKind::Compose.key().to_string(),
        message: e.to_string(),
    })?;

    let env_file = paths::portable(&config.artifacts.env);
    Ok(format!(
        "# Generated by wpstack\n\
         # Passwords are substituted from {env_file}; start with `docker-compose up -d`.\n\
         {yaml}"
    ))
}

fn database_service(config: &ScaffoldConfig) -> Service {
    let creds = &config.credentials;
    let db = &config.database;

    let environment = BTreeMap::from([
        ("MYSQL_DATABASE".to_string(), db.name.clone()),
        ("MYSQL_USER".to_string(), db.user.clone()),
        ("MYSQL_PASSWORD".to_string(), env_ref(&creds.app_env)),
        ("MYSQL_ROOT_PASSWORD".to_string(), env_ref(&creds.root_env)),
    ]);

    Service {
        image: config.images.database.clone(),
        restart: Some("unless-stopped".to_string()),
        environment,
        volumes: vec![format!("{}:{}", volumes::DB_DATA, container::MYSQL_DATA)],
        healthcheck: Some(Healthcheck {
            test: ["CMD", "mysqladmin", "ping", "-h", "localhost"]
                .into_iter()
                .map(String::from)
                .collect(),
            interval: "10s".to_string(),
            timeout: "5s".to_string(),
            retries: 5,
            start_period: Some("30s".to_string()),
        }),
        ..Default::default()
    }
}

fn app_service(config: &ScaffoldConfig) -> Service {
    let creds = &config.credentials;
    let db = &config.database;

    let environment = BTreeMap::from([
        (
            "WORDPRESS_DB_HOST".to_string(),
            format!("{DB_SERVICE}:{MYSQL_PORT}"),
        ),
        ("WORDPRESS_DB_USER".to_string(), db.user.clone()),
        ("WORDPRESS_DB_PASSWORD".to_string(), env_ref(&creds.app_env)),
        ("WORDPRESS_DB_NAME".to_string(), db.name.clone()),
    ]);

    let php_rel = &config.artifacts.php;
    let php_name = php_rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom.ini".to_string());

    Service {
        image: config.images.wordpress.clone(),
        restart: Some("unless-stopped".to_string()),
        depends_on: Some(DependsOn::Conditions(BTreeMap::from([(
            DB_SERVICE.to_string(),
            DependsOnCondition {
                condition: "service_healthy".to_string(),
            },
        )]))),
        environment,
        volumes: vec![
            format!("{}:{}", volumes::WP_DATA, container::WEB_ROOT),
            format!(
                "{}:{}/{}:ro",
                paths::bind_source(php_rel),
                container::PHP_CONF_DIR,
                php_name
            ),
        ],
        ..Default::default()
    }
}

fn proxy_service(config: &ScaffoldConfig) -> Service {
    Service {
        image: config.images.proxy.clone(),
        restart: Some("unless-stopped".to_string()),
        depends_on: Some(DependsOn::Services(vec![APP_SERVICE.to_string()])),
        ports: vec![format!("{}:80", config.proxy.http_port)],
        volumes: vec![
            format!("{}:{}:ro", volumes::WP_DATA, container::WEB_ROOT),
            format!(
                "{}:{}:ro",
                paths::bind_source(&config.artifacts.nginx),
                container::NGINX_CONF
            ),
        ],
        ..Default::default()
    }
}
