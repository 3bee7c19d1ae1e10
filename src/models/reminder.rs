use super::category::Category;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

/// When a reminder is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReminderSchedule {
    /// Repeats through the current day, at least `repeat_minutes` apart.
    Today { repeat_minutes: i64 },
    /// Fires once, on a fixed calendar date.
    Date { date: NaiveDate },
    /// Fires every month on the day-of-month of `date`.
    Monthly { date: NaiveDate },
}

impl ReminderSchedule {
    /// Convert enum → DB `type` column
    pub fn type_str(&self) -> &'static str {
        match self {
            ReminderSchedule::Today { .. } => "today",
            ReminderSchedule::Date { .. } => "date",
            ReminderSchedule::Monthly { .. } => "monthly",
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReminderSchedule::Today { .. } => None,
            ReminderSchedule::Date { date } | ReminderSchedule::Monthly { date } => Some(*date),
        }
    }

    pub fn repeat_minutes(&self) -> Option<i64> {
        match self {
            ReminderSchedule::Today { repeat_minutes } => Some(*repeat_minutes),
            _ => None,
        }
    }

    /// Convert DB columns → enum.
    /// `date` is required for `date`/`monthly`, `repeat_minutes` for `today`.
    pub fn from_parts(
        kind: &str,
        date: Option<NaiveDate>,
        repeat_minutes: Option<i64>,
    ) -> AppResult<Self> {
        match kind {
            "today" => {
                let repeat_minutes = repeat_minutes.ok_or_else(|| {
                    AppError::Validation("a 'today' reminder needs a repeat interval".into())
                })?;
                if repeat_minutes <= 0 {
                    return Err(AppError::Validation(format!(
                        "repeat interval must be positive, got {repeat_minutes}"
                    )));
                }
                Ok(ReminderSchedule::Today { repeat_minutes })
            }
            "date" => date
                .map(|date| ReminderSchedule::Date { date })
                .ok_or_else(|| AppError::Validation("a 'date' reminder needs a date".into())),
            "monthly" => date
                .map(|date| ReminderSchedule::Monthly { date })
                .ok_or_else(|| AppError::Validation("a 'monthly' reminder needs a date".into())),
            other => Err(AppError::InvalidReminderType(other.to_string())),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ReminderSchedule::Today { .. } => "Today (repeating)".to_string(),
            ReminderSchedule::Date { date } => format!("On {}", date.format("%Y-%m-%d")),
            ReminderSchedule::Monthly { date } => format!("Monthly on {:02}", date.day()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub schedule: ReminderSchedule,
    pub time: NaiveTime,
    pub active: bool,
    pub done: bool,
    pub last_fired_ts: Option<i64>,
    pub snooze_until_ts: Option<i64>,
    pub created_ts: i64,
}

impl Reminder {
    /// Status shown next to the reminder: Done wins over Paused.
    pub fn status_label(&self) -> &'static str {
        if self.done {
            "Done"
        } else if self.active {
            "Active"
        } else {
            "Paused"
        }
    }

    pub fn is_snoozed_at(&self, now: i64) -> bool {
        matches!(self.snooze_until_ts, Some(until) if now < until)
    }
}

/// A validated reminder definition that does not exist in the store yet.
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub category: Category,
    pub title: String,
    pub schedule: ReminderSchedule,
    pub time: NaiveTime,
    pub created_ts: i64,
}

impl NewReminder {
    /// Build a definition, rejecting empty titles.
    pub fn new(
        category: Category,
        title: &str,
        schedule: ReminderSchedule,
        time: NaiveTime,
        created_ts: i64,
    ) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("reminder title must not be empty".into()));
        }

        Ok(Self {
            category,
            title: title.to_string(),
            schedule,
            time,
            created_ts,
        })
    }
}

/// Partial update of a stored reminder.
/// The outer `Option` selects the column, the inner one is the nullable value.
#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub active: Option<bool>,
    pub done: Option<bool>,
    pub last_fired_ts: Option<Option<i64>>,
    pub snooze_until_ts: Option<Option<i64>>,
}

impl ReminderPatch {
    pub fn fired_at(ts: i64) -> Self {
        Self {
            last_fired_ts: Some(Some(ts)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
            && self.done.is_none()
            && self.last_fired_ts.is_none()
            && self.snooze_until_ts.is_none()
    }
}
