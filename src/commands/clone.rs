//! Clone command
//!
//! Resolves `--input` / `--output` into endpoints, checks what argument
//! parsing leaves unchecked, and performs the transfer that needs no
//! Telegram connection: copying one chat dump into a new folder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::cli::CloneArgs;
use crate::config::{ChatEntity, Config};
use crate::error::{Error, Result};
use crate::history::HistoryRequest;
use crate::locator::ChatLocator;
use crate::session::{check_session_exists, SessionLock};

/// One side of a clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    Live { entity: ChatEntity },
    Archive { dir: PathBuf, dump: PathBuf },
}

impl Endpoint {
    pub fn is_live(&self) -> bool {
        matches!(self, Endpoint::Live { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClonePlan {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub forward: bool,
    pub history: HistoryRequest,
}

fn resolve(locator: &ChatLocator, side: Side) -> Result<Endpoint> {
    if let Some(entity) = locator.to_entity() {
        return Ok(Endpoint::Live { entity });
    }

    let dir = locator
        .archive_dir()
        .ok_or_else(|| Error::InvalidArgument(format!("{} is not a chat dump", locator)))?;

    let archive = match side {
        Side::Input => Archive::open(dir)?,
        Side::Output => Archive::vacant(dir)?,
    };

    Ok(Endpoint::Archive {
        dir: archive.dir().to_path_buf(),
        dump: archive.dump_path(),
    })
}

/// Validate the arguments and describe the clone. Nothing is written.
pub fn build_plan(args: &CloneArgs) -> Result<ClonePlan> {
    let input = ChatLocator::from(args.input.clone());
    let output = ChatLocator::from(args.output.clone());

    if input == output {
        return Err(Error::InvalidArgument(format!(
            "input and output are the same chat: {}",
            input
        )));
    }

    let source = resolve(&input, Side::Input)?;
    let destination = resolve(&output, Side::Output)?;

    let mut forward = args.forward;
    if forward && !(source.is_live() && destination.is_live()) {
        warn!("--forward needs a live chat on both sides, ignoring it");
        forward = false;
    }

    Ok(ClonePlan {
        source,
        destination,
        forward,
        history: HistoryRequest::new(args.reverse),
    })
}

/// Run a clone. Returns the number of bytes written to the destination dump.
pub async fn run(args: &CloneArgs, config: &Config) -> Result<u64> {
    let plan = build_plan(args)?;
    info!("Clone plan: {}", serde_json::to_string(&plan)?);

    match (&plan.source, &plan.destination) {
        (Endpoint::Archive { dump: from, .. }, Endpoint::Archive { dir, .. }) => {
            copy_dump(from, dir).await
        }
        (source, destination) => {
            if !config.has_credentials() {
                warn!("Telegram api_id/api_hash are not configured");
            }
            check_session_exists(config.session_file())?;
            let _lock = SessionLock::acquire(config.lock_file())?;

            Err(Error::LiveTransferUnavailable(format!(
                "{} -> {}",
                describe(source),
                describe(destination)
            )))
        }
    }
}

/// Copy `from` into a new `dump.db` under `dir`. A folder created here is
/// removed again if the copy fails.
async fn copy_dump(from: &Path, dir: &Path) -> Result<u64> {
    let fresh_dir = !dir.is_dir();
    let target = Archive::prepare(dir)?;
    let to = target.dump_path();
    debug!("Copying {} -> {}", from.display(), to.display());

    match copy_into_new(from, &to).await {
        Ok(bytes) => {
            info!("Cloned {} bytes into {}", bytes, to.display());
            Ok(bytes)
        }
        Err(err) => {
            if fresh_dir {
                if let Err(e) = tokio::fs::remove_dir(dir).await {
                    warn!("Failed to remove {}: {}", dir.display(), e);
                }
            }
            Err(err)
        }
    }
}

/// Copy a file to `to`, which must not exist yet. A partial copy is removed.
async fn copy_into_new(from: &Path, to: &Path) -> Result<u64> {
    let mut source = File::open(from).await?;
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::ArchiveExists(to.to_path_buf()),
            _ => Error::IoError(e),
        })?;

    let copied = async {
        let bytes = tokio::io::copy(&mut source, &mut target).await?;
        target.flush().await?;
        Ok::<_, std::io::Error>(bytes)
    }
    .await;

    match copied {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            drop(target);
            let _ = tokio::fs::remove_file(to).await;
            Err(e.into())
        }
    }
}

fn describe(endpoint: &Endpoint) -> String {
    match endpoint {
        Endpoint::Live { entity } => entity.to_string(),
        Endpoint::Archive { dir, .. } => dir.display().to_string(),
    }
}
