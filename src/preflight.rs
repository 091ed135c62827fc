//! Preflight checks - ensure the host can run the generated stack.
//!
//! Every required tool is looked up before anything touches the
//! filesystem. A missing tool fails the run with every missing name listed.

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, ScaffoldError};

/// Lookup result for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    /// Resolved executable, `None` if not found
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreflightReport {
    pub tools: Vec<ToolStatus>,
}

impl PreflightReport {
    pub fn passed(&self) -> bool {
        self.tools.iter().all(ToolStatus::found)
    }

    /// Missing tool names, in the order they were checked
    pub fn missing(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|t| !t.found())
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Turn a failed report into an error naming every missing tool.
    pub fn ensure(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        Err(ScaffoldError::MissingTools {
            tools: missing.into_iter().map(String::from).collect(),
        })
    }
}

/// Check tools against the process `PATH`.
pub fn check<S: AsRef<str>>(tools: &[S]) -> PreflightReport {
    collect(tools, |name| which::which(name))
}

/// Check tools against an explicit search path, resolving relative entries
/// from `cwd`.
pub fn check_in<S, P>(tools: &[S], search_path: Option<P>, cwd: &Path) -> PreflightReport
where
    S: AsRef<str>,
    P: AsRef<OsStr>,
{
    let search_path = search_path.as_ref().map(|p| p.as_ref().to_os_string());
    collect(tools, |name| which::which_in(name, search_path.as_ref(), cwd))
}

fn collect<S, F>(tools: &[S], mut lookup: F) -> PreflightReport
where
    S: AsRef<str>,
    F: FnMut(&str) -> std::result::Result<PathBuf, which::Error>,
{
    let tools = tools
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let path = match lookup(name) {
                Ok(path) => {
                    debug!(tool = name, path = %path.display(), "found");
                    Some(path)
                }
                Err(e) => {
                    warn!(tool = name, error = %e, "not found");
                    None
                }
            };
            ToolStatus {
                name: name.to_string(),
                path,
            }
        })
        .collect();

    PreflightReport { tools }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_tool(dir: &Path, name: &str) {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_all_tools_found() {
        let bin = TempDir::new().unwrap();
        fake_tool(bin.path(), "docker");
        fake_tool(bin.path(), "docker-compose");

        let report = check_in(&["docker", "docker-compose"], Some(bin.path()), bin.path());

        assert!(report.passed());
        assert!(report.ensure().is_ok());
        assert_eq!(
            report.tools[0].path.as_deref(),
            Some(bin.path().join("docker").as_path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_tool_is_named() {
        let bin = TempDir::new().unwrap();
        fake_tool(bin.path(), "docker");

        let report = check_in(&["docker", "docker-compose"], Some(bin.path()), bin.path());

        assert!(!report.passed());
        assert_eq!(report.missing(), ["docker-compose"]);
        let err = report.ensure().unwrap_err();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("docker-compose"));
    }

    #[test]
    fn test_all_missing_are_listed_in_order() {
        let bin = TempDir::new().unwrap();

        let report = check_in(&["docker", "docker-compose"], Some(bin.path()), bin.path());

        assert_eq!(report.missing(), ["docker", "docker-compose"]);
        match report.ensure().unwrap_err() {
            ScaffoldError::MissingTools { tools } => {
                assert_eq!(tools, ["docker", "docker-compose"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_a_tool() {
        let bin = TempDir::new().unwrap();
        std::fs::write(bin.path().join("docker"), "not executable").unwrap();

        let report = check_in(&["docker"], Some(bin.path()), bin.path());
        assert!(!report.passed());
    }

    #[test]
    fn test_check_uses_process_path() {
        let report = check(&["wpstack-no-such-tool"]);
        assert_eq!(
            report.ensure().unwrap_err().to_string(),
            "Required tool not found: wpstack-no-such-tool"
        );
    }

    #[test]
    fn test_empty_search_path_finds_nothing() {
        let cwd = TempDir::new().unwrap();
        let report = check_in(&["docker"], Some(""), cwd.path());
        assert_eq!(report.missing(), ["docker"]);
    }
}
