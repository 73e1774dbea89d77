//! Cleanup command: clear what an interrupted clone leaves behind

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::session::remove_stale_lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    NothingToDo,
}

pub async fn run(config: &Config) -> Result<CleanupOutcome> {
    let lock_file = config.lock_file();

    if remove_stale_lock(&lock_file)? {
        info!("Removed stale session lock {}", lock_file);
        Ok(CleanupOutcome::Removed)
    } else {
        info!("Nothing to clean up");
        Ok(CleanupOutcome::NothingToDo)
    }
}
