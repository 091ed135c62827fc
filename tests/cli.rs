//! Run the binary with a controlled PATH.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const ARTIFACTS: [&str; 6] = [
    "docker-compose.yml",
    "nginx/default.conf",
    "php/uploads.ini",
    ".env",
    ".gitignore",
    "README.md",
];

/// Directory of executables standing in for the real tools
fn fake_bin(tools: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for tool in tools {
        let path = dir.path().join(tool);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }
    dir
}

fn wpstack(bin: &Path, cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wpstack"))
        .args(args)
        .current_dir(cwd)
        .env("PATH", bin)
        .env_remove("WPSTACK_LOG")
        .output()
        .unwrap()
}

#[cfg(unix)]
#[test]
fn test_success_writes_six_artifacts() {
    let bin = fake_bin(&["docker", "docker-compose"]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &[]);

    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let root = work.path().join("wordpress-site");
    for rel in ARTIFACTS {
        assert!(root.join(rel).is_file(), "missing {rel}");
    }

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("MYSQL_ROOT_PASSWORD="));
    assert!(stdout.contains("docker-compose up -d"));
}

#[cfg(unix)]
#[test]
fn test_missing_tool_exits_one_and_writes_nothing() {
    let bin = fake_bin(&["docker"]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("docker-compose"), "{stderr}");
    assert!(!work.path().join("wordpress-site").exists());
}

#[cfg(unix)]
#[test]
fn test_missing_docker_exits_one_and_writes_nothing() {
    let bin = fake_bin(&["docker-compose"]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr
            .lines()
            .any(|l| l.ends_with("Required tool not found: docker")),
        "{stderr}"
    );
    assert!(!work.path().join("wordpress-site").exists());
}

#[test]
fn test_no_tools_at_all() {
    let bin = fake_bin(&[]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_dry_run_writes_nothing() {
    let bin = fake_bin(&["docker", "docker-compose"]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &["--dry-run"]);

    assert_eq!(out.status.code(), Some(0), "{out:?}");
    assert!(!work.path().join("wordpress-site").exists());
}

#[cfg(unix)]
#[test]
fn test_json_summary_matches_env_file() {
    let bin = fake_bin(&["docker", "docker-compose"]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &["--json", "-o", "sites"]);

    assert_eq!(out.status.code(), Some(0), "{out:?}");
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["artifacts"].as_array().unwrap().len(), 6);
    assert_eq!(summary["dry_run"], false);

    let env_path = work.path().join("sites/wordpress-site/.env");
    for item in dotenvy::from_path_iter(&env_path).unwrap() {
        let (key, value) = item.unwrap();
        assert_eq!(summary["credentials"][&key], value.as_str());
    }
}

#[cfg(unix)]
#[test]
fn test_config_file_overrides_defaults() {
    let bin = fake_bin(&["podman"]);
    let work = TempDir::new().unwrap();
    std::fs::write(
        work.path().join("wpstack.toml"),
        "[project]\nname = \"blog\"\n\n[preflight]\ntools = [\"podman\"]\n",
    )
    .unwrap();

    let out = wpstack(bin.path(), work.path(), &["-c", "wpstack.toml"]);

    assert_eq!(out.status.code(), Some(0), "{out:?}");
    assert!(work.path().join("blog/docker-compose.yml").is_file());
}

#[test]
fn test_invalid_config_exits_one() {
    let bin = fake_bin(&[]);
    let work = TempDir::new().unwrap();
    std::fs::write(work.path().join("bad.toml"), "[credentials]\nlength = 0\n").unwrap();

    let out = wpstack(bin.path(), work.path(), &["--config", "bad.toml"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("bad.toml"), "{stderr}");
}

#[test]
fn test_usage_error_exits_one() {
    let bin = fake_bin(&[]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &["extra"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&out.stderr).is_empty());
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn test_help_exits_zero() {
    let bin = fake_bin(&[]);
    let work = TempDir::new().unwrap();

    let out = wpstack(bin.path(), work.path(), &["--help"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--dry-run"));
}
