//! Single source of truth for the generated stack's filesystem layout.
//!
//! This module defines WHERE things live, on the host and inside the
//! containers. It has no I/O, no validation, no business logic.
//!
//! # Host Paths
//!
//! ```text
//! <output>/<project.name>/
//! ├── docker-compose.yml       # Orchestration (db, wordpress, nginx)
//! ├── .env                     # Generated passwords (0600, gitignored)
//! ├── .gitignore
//! ├── README.md
//! ├── nginx/default.conf       # Mounted into the nginx container
//! └── php/uploads.ini          # Mounted into the wordpress container
//! ```
//!
//! # Container Paths
//!
//! ```text
//! db         /var/lib/mysql                       ← volume db_data
//! wordpress  /var/www/html                        ← volume wp_data
//!            /usr/local/etc/php/conf.d/<ini>      ← php config (ro)
//! nginx      /var/www/html                        ← volume wp_data (ro)
//!            /etc/nginx/conf.d/default.conf       ← nginx config (ro)
//! ```

use std::path::{Component, Path, PathBuf};

use crate::project::ScaffoldConfig;
use crate::scaffold::ArtifactKind;

// =============================================================================
// Host
// =============================================================================

/// Project directory: `<output>/<project.name>/`
pub fn project_root(output: &Path, config: &ScaffoldConfig) -> PathBuf {
    output.join(&config.project.name)
}

/// Absolute (or output-relative) path of one artifact
pub fn artifact_path(root: &Path, config: &ScaffoldConfig, kind: ArtifactKind) -> PathBuf {
    root.join(config.artifacts.path_for(kind))
}

/// A project-relative path in the `a/b/c` form compose and gitignore expect,
/// whatever the host separator.
pub fn portable(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Bind-mount source for a project file: `./nginx/default.conf`
pub fn bind_source(relative: &Path) -> String {
    format!("./{}", portable(relative))
}

// =============================================================================
// Containers
// =============================================================================

/// Container paths used in volume mounts
pub mod container {
    /// WordPress document root, shared by wordpress and nginx
    pub const WEB_ROOT: &str = "/var/www/html";

    /// MySQL data directory
    pub const MYSQL_DATA: &str = "/var/lib/mysql";

    /// Nginx server block loaded by the stock nginx image
    pub const NGINX_CONF: &str = "/etc/nginx/conf.d/default.conf";

    /// Directory the official PHP images scan for extra ini files
    pub const PHP_CONF_DIR: &str = "/usr/local/etc/php/conf.d";
}

/// Named compose volumes
pub mod volumes {
    pub const DB_DATA: &str = "db_data";
    pub const WP_DATA: &str = "wp_data";
}
