//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Session file validation
//! - Removal of lock files left behind by interrupted runs

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock on the session.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired session lock {}", path.display());
                Ok(Self {
                    path,
                    lock_file: Some(lock_file),
                })
            }
            Err(_) => {
                error!(
                    "Telegram session is already used by another process. \
                     Wait for it to finish and try again."
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Check if the session file exists.
pub fn check_session_exists<P: AsRef<Path>>(session_file: P) -> Result<()> {
    let session_file = session_file.as_ref();

    if !session_file.exists() {
        error!(
            "Session file '{}' not found. Log in with a Telegram client first.",
            session_file.display()
        );
        return Err(Error::SessionNotFound(session_file.display().to_string()));
    }

    Ok(())
}

/// Remove a lock file nobody holds anymore.
///
/// Returns `Ok(false)` when there is no lock file, `Ok(true)` once a stale
/// one is removed, and [`Error::SessionLocked`] while a live process holds it.
pub fn remove_stale_lock<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();

    let file = match OpenOptions::new().write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(Error::LockError(format!(
                "Failed to open lock file {}: {}",
                path.display(),
                e
            )))
        }
    };

    if file.try_lock_exclusive().is_err() {
        return Err(Error::SessionLocked);
    }

    let removed = std::fs::remove_file(path);
    let _ = file.unlock();
    removed?;

    Ok(true)
}
