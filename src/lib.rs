//! Telegram Clone Chat library
//!
//! This library provides tools to:
//! - Parse the `clone` / `cleanup` command line
//! - Tell chat ids and @handles apart from dumped chat folders
//! - Describe the message history window a clone walks
//! - Copy dumped chats and guard the Telegram session with a lock file

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod locator;
pub mod session;

// Re-export common types
pub use cli::{parse_from, Cli, CloneArgs, Commands, LogLevel};
pub use config::{ChatEntity, Config};
pub use error::{Error, Result};
pub use locator::{coerce, ChatArg, ChatLocator};
pub use session::{check_session_exists, SessionLock};

pub mod commands;
