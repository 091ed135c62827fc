//! Text templates for the nginx, PHP, gitignore and README artifacts.
//!
//! Templates are embedded at build time and filled by plain `{{.key}}`
//! substitution. A placeholder without a value is an error.

use crate::error::{Result, ScaffoldError};
use crate::paths::{self, container};
use crate::project::ScaffoldConfig;
use crate::scaffold::compose::{APP_SERVICE, DB_SERVICE, PROXY_SERVICE};
use crate::scaffold::ArtifactKind;

const NGINX_TEMPLATE: &str = include_str!("../../resources/templates/nginx.conf.tmpl");
const PHP_TEMPLATE: &str = include_str!("../../resources/templates/uploads.ini.tmpl");
const GITIGNORE_TEMPLATE: &str = include_str!("../../resources/templates/gitignore.tmpl");
const README_TEMPLATE: &str = include_str!("../../resources/templates/README.md.tmpl");

/// Replace every `{{.key}}` with its value in a single pass. Values are
/// copied verbatim, so a value that looks like a placeholder stays as is.
pub fn fill(kind: ArtifactKind, template: &str, vars: &[(&str, String)]) -> Result<String> {
    let unfilled = |placeholder: &str| ScaffoldError::Render {
        artifact: kind.key().to_string(),
        message: format!("unfilled placeholder {placeholder}"),
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{.") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find("}}") else {
            return Err(unfilled(tail.lines().next().unwrap_or(tail)));
        };
        let placeholder = &tail[..end + 2];
        let key = &placeholder[3..end];
        let (_, value) = vars
            .iter()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| unfilled(placeholder))?;
        out.push_str(value);
        rest = &tail[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}

pub fn nginx(config: &ScaffoldConfig) -> Result<String> {
    fill(
        ArtifactKind::NginxConfig,
        NGINX_TEMPLATE,
        &[
            ("app_service", APP_SERVICE.to_string()),
            ("web_root", container::WEB_ROOT.to_string()),
            ("max_body_size", config.php.upload_max_filesize.clone()),
            (
                "upstream",
                format!("{APP_SERVICE}:{}", config.proxy.fastcgi_port),
            ),
            ("read_timeout", config.php.max_execution_time.to_string()),
        ],
    )
}

pub fn php(config: &ScaffoldConfig) -> Result<String> {
    let php = &config.php;
    fill(
        ArtifactKind::PhpConfig,
        PHP_TEMPLATE,
        &[
            ("upload_max_filesize", php.upload_max_filesize.clone()),
            ("post_max_size", php.post_max_size.clone()),
            ("max_execution_time", php.max_execution_time.to_string()),
            ("memory_limit", php.memory_limit.clone()),
        ],
    )
}

pub fn gitignore(config: &ScaffoldConfig) -> Result<String> {
    fill(
        ArtifactKind::GitIgnore,
        GITIGNORE_TEMPLATE,
        &[("env_file", paths::portable(&config.artifacts.env))],
    )
}

/// README with operational commands. `generated` is the date shown in the
/// header.
pub fn readme(config: &ScaffoldConfig, generated: &str) -> Result<String> {
    let artifacts = &config.artifacts;
    fill(
        ArtifactKind::Readme,
        README_TEMPLATE,
        &[
            ("name", config.project.name.clone()),
            ("generated", generated.to_string()),
            ("compose_file", paths::portable(&artifacts.compose)),
            ("nginx_file", paths::portable(&artifacts.nginx)),
            ("php_file", paths::portable(&artifacts.php)),
            ("env_file", paths::portable(&artifacts.env)),
            ("db_service", DB_SERVICE.to_string()),
            ("app_service", APP_SERVICE.to_string()),
            ("proxy_service", PROXY_SERVICE.to_string()),
            ("db_name", config.database.name.clone()),
            ("root_env", config.credentials.root_env.clone()),
            ("app_env", config.credentials.app_env.clone()),
            ("http_port", config.proxy.http_port.to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_all_occurrences() {
        let out = fill(
            ArtifactKind::Readme,
            "{{.a}} and {{.a}} then {{.b}}",
            &[("a", "x".to_string()), ("b", "y".to_string())],
        )
        .unwrap();
        assert_eq!(out, "x and x then y");
    }

    #[test]
    fn test_fill_reports_leftover_placeholder() {
        let err = fill(ArtifactKind::Readme, "hello {{.who}}", &[]).unwrap_err();
        assert!(err.to_string().contains("{{.who}}"), "{err}");
    }

    #[test]
    fn test_nginx_routes_php_to_app_service() {
        let conf = nginx(&ScaffoldConfig::default()).unwrap();
        assert!(conf.contains("fastcgi_pass wordpress:9000;"));
        assert!(conf.contains("client_max_body_size 64M;"));
        assert!(conf.contains("root /var/www/html;"));
        assert!(conf.contains("fastcgi_read_timeout 300s;"));
    }

    #[test]
    fn test_nginx_denies_sensitive_files_before_php() {
        let conf = nginx(&ScaffoldConfig::default()).unwrap();
        let deny = conf.find("wp-config").unwrap();
        let php = conf.find("location ~ \\.php$").unwrap();
        assert!(deny < php);
        assert!(conf.contains("location ~ /\\. {"));
    }

    #[test]
    fn test_php_limits() {
        let mut config = ScaffoldConfig::default();
        config.php.memory_limit = "512M".to_string();
        let ini = php(&config).unwrap();
        assert!(ini.contains("upload_max_filesize = 64M\n"));
        assert!(ini.contains("post_max_size = 64M\n"));
        assert!(ini.contains("max_execution_time = 300\n"));
        assert!(ini.contains("memory_limit = 512M\n"));
    }

    #[test]
    fn test_gitignore_lists_env_file() {
        let ignore = gitignore(&ScaffoldConfig::default()).unwrap();
        assert!(ignore.lines().any(|l| l == ".env"));
        assert!(ignore.lines().any(|l| l == "*.sql"));
    }

    #[test]
    fn test_values_are_not_expanded_again() {
        let mut config = ScaffoldConfig::default();
        config.project.name = "{{.http_port}}".to_string();
        let readme = readme(&config, "2026-10-18").unwrap();
        assert!(readme.starts_with("# {{.http_port}}\n"));

        let out = fill(
            ArtifactKind::Readme,
            "{{.a}}{{.b}}",
            &[("a", "{{.b}}".to_string()), ("b", "x".to_string())],
        )
        .unwrap();
        assert_eq!(out, "{{.b}}x");
    }

    #[test]
    fn test_fill_reports_unterminated_placeholder() {
        let err = fill(ArtifactKind::Readme, "hello {{.who", &[]).unwrap_err();
        assert!(err.to_string().contains("{{.who"), "{err}");
    }

    #[test]
    fn test_readme_mentions_commands_and_files() {
        let readme = readme(&ScaffoldConfig::default(), "2026-10-18").unwrap();
        assert!(readme.starts_with("# wordpress-site\n"));
        assert!(readme.contains("on 2026-10-18"));
        assert!(readme.contains("docker-compose up -d"));
        assert!(readme.contains("docker-compose down"));
        assert!(readme.contains("MYSQL_ROOT_PASSWORD"));
        assert!(readme.contains("http://localhost:80/"));
    }
}
