//! Message history cursor
//!
//! Describes which part of a chat history a clone walks and in which
//! direction. Zero ids and a missing date mean "no bound".
//!
//! Newest to oldest (the default): `offset_id` and `offset_date` are exclusive
//! upper bounds, `max_id` is an exclusive upper bound and `min_id` an
//! exclusive lower bound.
//!
//! Oldest to newest (`reverse`): `offset_id` and `offset_date` turn into
//! exclusive lower bounds, and `min_id` acts like `offset_id` instead of
//! like a second `max_id`.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRequest {
    pub offset_id: i32,
    pub offset_date: Option<DateTime<Utc>>,
    pub min_id: i32,
    pub max_id: i32,
    pub reverse: bool,
}

impl HistoryRequest {
    pub fn new(reverse: bool) -> Self {
        Self {
            offset_id: 0,
            offset_date: None,
            min_id: 0,
            max_id: 0,
            reverse,
        }
    }

    pub fn with_offset_id(mut self, id: i32) -> Self {
        self.offset_id = id;
        self
    }

    pub fn with_offset_date(mut self, date: DateTime<Utc>) -> Self {
        self.offset_date = Some(date);
        self
    }

    pub fn with_min_id(mut self, id: i32) -> Self {
        self.min_id = id;
        self
    }

    pub fn with_max_id(mut self, id: i32) -> Self {
        self.max_id = id;
        self
    }

    pub fn order(&self) -> Order {
        if self.reverse {
            Order::OldestFirst
        } else {
            Order::NewestFirst
        }
    }

    /// Id the first page starts after (reverse) or before (default).
    ///
    /// In reverse order `min_id` doubles as the starting offset, so the
    /// stricter of the two wins.
    pub fn start_offset_id(&self) -> i32 {
        if self.reverse {
            self.offset_id.max(self.min_id)
        } else {
            self.offset_id
        }
    }

    /// Whether a message falls inside the requested window.
    pub fn admits(&self, id: i32, date: DateTime<Utc>) -> bool {
        if self.min_id != 0 && id <= self.min_id {
            return false;
        }
        if self.max_id != 0 && id >= self.max_id {
            return false;
        }

        if self.reverse {
            if self.offset_id != 0 && id <= self.offset_id {
                return false;
            }
            if matches!(self.offset_date, Some(bound) if date <= bound) {
                return false;
            }
        } else {
            if self.offset_id != 0 && id >= self.offset_id {
                return false;
            }
            if matches!(self.offset_date, Some(bound) if date >= bound) {
                return false;
            }
        }

        true
    }

    /// Move the cursor past the last message yielded by a page.
    ///
    /// The id becomes the new offset; the date bound is dropped since the id
    /// already excludes everything on the consumed side.
    pub fn advance(&mut self, last_id: i32) {
        self.offset_id = last_id;
        self.offset_date = None;
    }
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self::new(false)
    }
}
