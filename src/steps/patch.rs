//! Guarded config appends.
//!
//! A config patch appends a block exactly once: a sentinel line is checked
//! before appending, so repeated runs never duplicate configuration.

use std::path::Path;

use crate::error::Result;

/// Append `block` to `path` unless `sentinel` is already present.
///
/// The sentinel line is written immediately before the block. A missing
/// file (or missing parent directories) is created. Returns whether the
/// block was appended.
pub fn append_once(path: &Path, sentinel: &str, block: &str) -> Result<bool> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        String::new()
    };

    if existing.lines().any(|line| line.trim() == sentinel) {
        tracing::debug!(path = %path.display(), sentinel, "already patched, skipping");
        return Ok(false);
    }

    let mut patched = existing;
    if !patched.is_empty() && !patched.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(sentinel);
    patched.push('\n');
    patched.push_str(block);
    if !block.ends_with('\n') {
        patched.push('\n');
    }

    std::fs::write(path, patched)?;
    Ok(true)
}
