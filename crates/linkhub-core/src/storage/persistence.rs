//! JSON file persistence
//!
//! Both persisted documents are pretty-printed JSON files under the data
//! directory. Writes go to a temporary file first and are renamed into place
//! so a reader never observes a partially-written document.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::{HubError, HubResult};

/// Distinguishes temp files of concurrent writers within one process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Read a file, mapping "does not exist" to `None`
pub fn read_if_exists(path: &Path) -> HubResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HubError::from_read(e, path.to_path_buf())),
    }
}

/// Serialize `value` as pretty JSON and write it atomically to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> HubResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub fn atomic_write(path: &Path, data: &[u8]) -> HubResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| HubError::from_write(e, parent.to_path_buf()))?;
    }

    let temp_path = temp_path_for(path);

    let result = write_and_sync(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| HubError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(temp_path: &Path, data: &[u8]) -> HubResult<()> {
    let mut file =
        File::create(temp_path).map_err(|e| HubError::from_write(e, temp_path.to_path_buf()))?;
    file.write_all(data)
        .map_err(|e| HubError::from_write(e, temp_path.to_path_buf()))?;
    file.sync_all()
        .map_err(|e| HubError::from_write(e, temp_path.to_path_buf()))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", file_name, std::process::id(), n))
}
