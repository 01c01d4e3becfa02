//! Read-transform-replace for files on disk.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Before/after contents of one transformed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub path: PathBuf,
    pub before: Vec<u8>,
    pub after: Vec<u8>,
}

impl FileEdit {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    /// Replace the file with the new contents if they differ.
    pub fn persist(&self) -> Result<bool> {
        if !self.changed() {
            debug!(path = %self.path.display(), "unchanged, not writing");
            return Ok(false);
        }
        write_atomic(&self.path, &self.after)?;
        Ok(true)
    }
}

/// Read `path` and run `transform` over its bytes.
///
/// Nothing is written; call [`FileEdit::persist`] to apply the result.
pub fn transform_file<F>(path: &Path, transform: F) -> Result<FileEdit>
where
    F: FnOnce(&[u8]) -> Result<Vec<u8>>,
{
    let before = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let after = transform(&before).with_context(|| format!("transform {}", path.display()))?;
    Ok(FileEdit {
        path: path.to_path_buf(),
        before,
        after,
    })
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
///
/// Existing permissions are carried over to the replacement.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("path has no file name {}", path.display()))?;
    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);

    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(&tmp_path, meta.permissions())
            .with_context(|| format!("copy permissions to {}", tmp_path.display()))?;
    }
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
