//! Local chat dumps
//!
//! A dumped chat is a folder with a single `dump.db` file inside.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// File name of the dump inside an archive folder
pub const DUMP_FILE: &str = "dump.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    /// Open an existing dump. The folder must contain a regular `dump.db`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let archive = Self {
            dir: dir.as_ref().to_path_buf(),
        };

        if !archive.dump_path().is_file() {
            return Err(Error::ArchiveNotFound(archive.dir));
        }

        Ok(archive)
    }

    /// Check that a folder can receive a new dump without touching the disk.
    ///
    /// An existing `dump.db` is never overwritten.
    pub fn vacant<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let archive = Self {
            dir: dir.as_ref().to_path_buf(),
        };

        let dump = archive.dump_path();
        if dump.exists() {
            return Err(Error::ArchiveExists(dump));
        }

        Ok(archive)
    }

    /// Prepare a folder to receive a new dump, creating it if missing.
    pub fn prepare<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let archive = Self::vacant(dir)?;

        if !archive.dir.is_dir() {
            debug!("Creating dump folder {}", archive.dir.display());
            fs::create_dir_all(&archive.dir)?;
        }

        Ok(archive)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dump_path(&self) -> PathBuf {
        self.dir.join(DUMP_FILE)
    }
}
