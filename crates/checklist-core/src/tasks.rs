use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Completion state stored for a single (task, day) cell.
///
/// An unmarked day is represented by the absence of a history entry, so only
/// these two values are ever stored; `Option<DayStatus>` is the full
/// three-valued cell state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Done,
    Missed,
}

impl DayStatus {
    /// Advance a cell one step through the cycle
    /// `unmarked -> done -> missed -> unmarked`.
    pub fn cycle(current: Option<DayStatus>) -> Option<DayStatus> {
        match current {
            None => Some(DayStatus::Done),
            Some(DayStatus::Done) => Some(DayStatus::Missed),
            Some(DayStatus::Missed) => None,
        }
    }
}

/// A tracked task and its per-day completion history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    /// Stable identifier, assigned at creation.
    pub id: Uuid,
    /// Display title; non-empty once created.
    pub title: String,
    /// Sparse history keyed by `YYYY-MM-DD`. An absent key means unmarked;
    /// an "unmarked" value is never stored.
    pub history: BTreeMap<String, DayStatus>,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            history: BTreeMap::new(),
        }
    }

    /// Status recorded for one date key, `None` when the day is unmarked.
    pub fn status(&self, date_key: &str) -> Option<DayStatus> {
        self.history.get(date_key).copied()
    }
}
