//! Whole-file replacement through a temporary file in the destination's
//! directory.
//!
//! The content is written to a uniquely named temporary file, flushed, given
//! the permissions of the file it replaces, then renamed over it. Readers
//! never see a half-written notebook, and a failed write leaves the
//! destination as it was. A symlinked destination is resolved first so the
//! link itself survives.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The file that is actually replaced when writing to `path`: the target
/// of a symlink, or `path` itself when nothing exists there yet.
pub fn resolve_target(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Replaces the file at `path` with `contents` in a single rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let target = resolve_target(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropping `tmp` on any error below removes the temporary file.
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("Failed to write temporary file: {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file: {}", tmp.path().display()))?;

    if let Ok(existing) = fs::metadata(&target) {
        fs::set_permissions(tmp.path(), existing.permissions()).with_context(|| {
            format!("Failed to copy permissions of {}", target.display())
        })?;
    }

    debug!("Replacing {} via {}", target.display(), tmp.path().display());
    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace output file: {}", target.display()))?;
    Ok(())
}
