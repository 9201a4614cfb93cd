//! The checklist grid engine: one in-memory store owning the ordered task
//! collection and the currently viewed month.
//!
//! Mutations never edit a published snapshot. Each effective change builds a
//! new collection and installs it as a fresh `Arc`, so observers can detect
//! changes by pointer equality and a snapshot taken before a mutation keeps
//! reading the pre-mutation state. Invalid input (blank titles, unknown ids,
//! out-of-range days) is a silent no-op rather than an error.

use std::sync::Arc;

use checklist_core::{
    month::{ViewedMonth, DAYS_IN_MONTH},
    tasks::{DayStatus, TaskRecord},
};
use chrono::Local;
use tracing::instrument;
use uuid::Uuid;

/// In-memory checklist grid: ordered task records plus the viewed month.
///
/// Single-threaded and synchronous; every operation runs to completion, so
/// each mutation observes the result of all prior mutations.
#[derive(Debug, Clone)]
pub struct ChecklistGrid {
    tasks: Arc<[TaskRecord]>,
    month: ViewedMonth,
}

impl ChecklistGrid {
    /// Empty grid viewing the real-world current month.
    pub fn new() -> Self {
        Self::with_month(ViewedMonth::current())
    }

    /// Empty grid pinned to a specific month view.
    pub fn with_month(month: ViewedMonth) -> Self {
        Self {
            tasks: Vec::new().into(),
            month,
        }
    }

    /// Current snapshot of the ordered task collection. Cheap to clone; a
    /// later mutation installs a fresh snapshot instead of editing this one.
    pub fn tasks(&self) -> Arc<[TaskRecord]> {
        Arc::clone(&self.tasks)
    }

    pub fn viewed_month(&self) -> ViewedMonth {
        self.month
    }

    /// Append a task with an empty history. Titles are trimmed; blank input
    /// is ignored.
    #[instrument(skip(self))]
    pub fn add_task(&mut self, raw_title: &str) {
        let title = raw_title.trim();
        if title.is_empty() {
            return;
        }
        let mut tasks = self.tasks.to_vec();
        tasks.push(TaskRecord::new(title));
        self.install(tasks);
    }

    /// Replace a task's title. A blank title cancels the edit and keeps the
    /// existing one; unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn rename_task(&mut self, id: Uuid, raw_title: &str) {
        let title = raw_title.trim();
        if title.is_empty() || !self.contains(id) {
            return;
        }
        let mut tasks = self.tasks.to_vec();
        for task in &mut tasks {
            if task.id == id {
                task.title = title.to_string();
            }
        }
        self.install(tasks);
    }

    /// Remove a task and its entire history. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn delete_task(&mut self, id: Uuid) {
        if !self.contains(id) {
            return;
        }
        let tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        self.install(tasks);
    }

    /// Advance one day cell through `unmarked -> done -> missed -> unmarked`
    /// under the viewed month. Writing "unmarked" deletes the history key.
    /// Unknown ids and days outside 1..=31 are ignored.
    #[instrument(skip(self))]
    pub fn toggle_day(&mut self, id: Uuid, day: u32) {
        if day == 0 || day > DAYS_IN_MONTH || !self.contains(id) {
            return;
        }
        let key = self.month.date_key(day);
        let mut tasks = self.tasks.to_vec();
        for task in &mut tasks {
            if task.id != id {
                continue;
            }
            match DayStatus::cycle(task.status(&key)) {
                Some(next) => {
                    task.history.insert(key.clone(), next);
                }
                None => {
                    task.history.remove(&key);
                }
            }
        }
        self.install(tasks);
    }

    /// Move the view forward or back by whole months, rolling over years.
    /// Task history is untouched.
    pub fn shift_month(&mut self, delta: i32) {
        self.month = self.month.shifted(delta);
    }

    /// Jump to a month (0-based index) within the viewed year. Out-of-range
    /// indices are ignored.
    pub fn set_month(&mut self, month: u32) {
        self.month = self.month.with_month(month);
    }

    /// Share of the 31 day slots marked done under the viewed month, as a
    /// percentage rounded half-up. Missed and unmarked days both count for
    /// nothing; the denominator is always 31.
    pub fn completion_percentage(&self, task: &TaskRecord) -> u8 {
        let done = (1..=DAYS_IN_MONTH)
            .filter(|day| task.status(&self.month.date_key(*day)) == Some(DayStatus::Done))
            .count();
        ((done as f64 / f64::from(DAYS_IN_MONTH)) * 100.0).round() as u8
    }

    /// True when `day` is the real-world current date under the viewed month.
    /// Always false while viewing any other month.
    pub fn is_today(&self, day: u32) -> bool {
        self.month.contains(day, Local::now().date_naive())
    }

    fn contains(&self, id: Uuid) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    fn install(&mut self, tasks: Vec<TaskRecord>) {
        self.tasks = tasks.into();
    }
}

impl Default for ChecklistGrid {
    fn default() -> Self {
        Self::new()
    }
}
