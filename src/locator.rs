//! Input/output chat locators
//!
//! `--input` and `--output` accept either a Telegram chat identifier or the
//! folder of a dumped chat. [`coerce`] turns the raw argument into a
//! [`ChatArg`]; [`ChatLocator`] then tells handles apart from dump folders.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ChatEntity;

/// Offset Telegram adds to channel/supergroup ids in the marked (`-100…`) form
pub const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

/// Raw value of `--input` / `--output` after integer-or-path coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatArg {
    Id(i64),
    Path(PathBuf),
}

/// Coerce a command line value: an integer if it parses as one, otherwise a path.
///
/// Never fails. Whether the path exists or the id names a real chat is left
/// to the command that consumes it.
pub fn coerce(value: &str) -> ChatArg {
    match parse_integer(value) {
        Some(id) => ChatArg::Id(id),
        None => ChatArg::Path(PathBuf::from(value)),
    }
}

/// Base-10 integer with the usual command line leniency: surrounding
/// whitespace is ignored and single underscores may separate digits.
fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let (sign, digits) = match trimmed.strip_prefix(['+', '-']) {
        Some(rest) => (&trimmed[..1], rest),
        None => ("", trimmed),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return None;
    }

    format!("{}{}", sign, digits.replace('_', "")).parse().ok()
}

/// clap `value_parser` wrapper around [`coerce`].
pub fn parse_chat_arg(value: &str) -> Result<ChatArg, std::convert::Infallible> {
    Ok(coerce(value))
}

impl fmt::Display for ChatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArg::Id(id) => write!(f, "{}", id),
            ChatArg::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What a coerced argument refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLocator {
    /// Marked Telegram id: positive for users, negative for groups and channels
    NumericId(i64),
    /// Public username, stored without the leading `@`
    Handle(String),
    /// Folder holding (or about to hold) a `dump.db`
    Archive(PathBuf),
}

impl From<ChatArg> for ChatLocator {
    fn from(arg: ChatArg) -> Self {
        match arg {
            ChatArg::Id(id) => ChatLocator::NumericId(id),
            ChatArg::Path(path) => match handle_of(&path) {
                Some(handle) => ChatLocator::Handle(handle),
                None => ChatLocator::Archive(path),
            },
        }
    }
}

fn handle_of(path: &Path) -> Option<String> {
    let text = path.to_str()?;
    let name = text.strip_prefix('@')?;
    if name.is_empty() || name.contains(['/', '\\']) {
        return None;
    }
    Some(name.to_string())
}

impl ChatLocator {
    pub fn is_live(&self) -> bool {
        !matches!(self, ChatLocator::Archive(_))
    }

    /// Telegram entity for live locators, `None` for dump folders.
    pub fn to_entity(&self) -> Option<ChatEntity> {
        match self {
            ChatLocator::NumericId(id) => Some(entity_from_marked_id(*id)),
            ChatLocator::Handle(name) => Some(ChatEntity::username(name)),
            ChatLocator::Archive(_) => None,
        }
    }

    pub fn archive_dir(&self) -> Option<&Path> {
        match self {
            ChatLocator::Archive(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Split a marked id into its entity kind and bare id.
pub fn entity_from_marked_id(id: i64) -> ChatEntity {
    if id <= -CHANNEL_ID_OFFSET {
        ChatEntity::Channel(-id - CHANNEL_ID_OFFSET)
    } else if id < 0 {
        ChatEntity::Chat(-id)
    } else {
        ChatEntity::UserId(id)
    }
}

impl fmt::Display for ChatLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatLocator::NumericId(id) => write!(f, "{}", id),
            ChatLocator::Handle(name) => write!(f, "@{}", name),
            ChatLocator::Archive(dir) => write!(f, "{}", dir.display()),
        }
    }
}
