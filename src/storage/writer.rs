use std::io::Write;
use std::path::Path;

use rkyv::rancor::Error as RkyvError;
use tracing::debug;

use super::error::StorageError;
use super::model::IndexFile;

/// Writes `data` to `path` atomically: temp file in the same directory, fsync, rename.
///
/// Readers see either the previous file or the complete new one.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(data).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

/// Serializes `file` with rkyv and writes it atomically.
pub fn write_index_file(path: &Path, file: &IndexFile) -> Result<(), StorageError> {
    let bytes = rkyv::to_bytes::<RkyvError>(file)
        .map_err(|e| StorageError::Serialization(format!("{:?}", e)))?;

    write_atomic(path, &bytes)?;

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        records = file.records.len(),
        "Index file written"
    );
    Ok(())
}
