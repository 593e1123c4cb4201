use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;

use super::error::StorageError;
use super::model::{INDEX_FORMAT_VERSION, IndexFile};

/// Memory-maps and validates an index file, returning an owned copy.
///
/// Archive validation (bytecheck) runs before any field is read, so a truncated or foreign
/// file is reported as [`StorageError::Corrupt`] rather than read as garbage.
pub fn read_index_file(path: &Path) -> Result<IndexFile, StorageError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let len = file
        .metadata()
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if len == 0 {
        return Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: "empty file".to_string(),
        });
    }

    // SAFETY: the file is opened read-only and only replaced via atomic rename, never
    // truncated in place, so the mapping stays valid while `mmap` is alive.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let index = rkyv::from_bytes::<IndexFile, RkyvError>(&mmap[..]).map_err(|e| {
        StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("{:?}", e),
        }
    })?;

    if index.format_version != INDEX_FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: index.format_version,
            expected: INDEX_FORMAT_VERSION,
        });
    }

    Ok(index)
}
