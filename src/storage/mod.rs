//! Durable index storage (rkyv archive, atomic writes, mmap reads).

pub mod error;
mod model;
mod reader;
mod writer;

pub use error::StorageError;
pub use model::{ArchivedIndexFile, INDEX_FORMAT_VERSION, IndexFile, StoredRecord};
pub use reader::read_index_file;
pub use writer::{write_atomic, write_index_file};
