//! Atomic file writes.
//!
//! Content goes to a temp file in the destination directory, is synced, then
//! renamed over the target. A reader never sees a half-written artifact.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, ScaffoldError};

/// Mode for files holding credentials
pub const SECRET_MODE: u32 = 0o600;

/// Mode for files the containers mount read-only
pub const PUBLIC_MODE: u32 = 0o644;

/// Write `content` to `path`, creating parent directories as needed.
/// `mode` is applied on unix before the file becomes visible.
pub fn write_atomic(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|source| ScaffoldError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let write_err = |source| ScaffoldError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(write_err)?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.write_all(content).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
