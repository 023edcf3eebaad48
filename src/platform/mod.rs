//! Access to executable containers and their embedded debug info

pub mod dwarf;

use std::path::{Path, PathBuf};

use log::debug;

use crate::debuginfo::cursor::EntryStream;
use crate::error::{OffsetError, Result};

/// Something that can produce a debug-info entry stream
pub trait DebugInfoSource {
    /// Read the full entry stream
    fn entry_stream(&self) -> Result<EntryStream>;
}

/// An executable on disk, read once into memory
#[derive(Debug, Clone)]
pub struct ObjectFile {
    path: PathBuf,
    data: Vec<u8>,
}

impl ObjectFile {
    /// Read the file at `path`
    ///
    /// Only I/O is checked here; the container itself is parsed by
    /// `entry_stream`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = std::fs::read(&path).map_err(|source| OffsetError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Read {} bytes from {}", data.len(), path.display());

        Ok(Self { path, data })
    }

    /// Wrap bytes already in memory
    pub fn from_bytes<P: AsRef<Path>>(path: P, data: Vec<u8>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data,
        }
    }

    /// Path this file was read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DebugInfoSource for ObjectFile {
    fn entry_stream(&self) -> Result<EntryStream> {
        dwarf::load_entry_stream(&self.data, &self.path)
    }
}

impl DebugInfoSource for EntryStream {
    fn entry_stream(&self) -> Result<EntryStream> {
        Ok(self.clone())
    }
}
