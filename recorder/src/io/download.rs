//! Delivering a finished recording to the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::types::Recording;

/// Write `recording` to `dir/file_name`, replacing any existing file.
///
/// The write goes through a temp file + rename so a partially written
/// recording never appears under the final name. Empty recordings are still
/// written.
pub fn download(recording: &Recording, dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    let path = dir.join(file_name);
    let tmp_path = dir.join(format!(".{file_name}.tmp"));

    debug!(path = %path.display(), bytes = recording.len(), "writing recording");
    fs::write(&tmp_path, recording.bytes())
        .with_context(|| format!("write temp recording {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("replace recording {}", path.display()))?;

    info!(path = %path.display(), bytes = recording.len(), mime_type = recording.mime_type, "recording saved");
    Ok(path)
}
