use crate::config::Config;
use crate::db::log::ttlog_at;
use crate::db::pool::DbPool;
use crate::db::reminders;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::reminder::{NewReminder, Reminder, ReminderPatch, ReminderSchedule};
use crate::utils::time::{MS_PER_MINUTE, parse_time_strict};
use chrono::{NaiveDate, NaiveTime};

/// User input for a new reminder, before defaults are applied.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub category: Category,
    pub title: String,
    /// `today`, `date` or `monthly`
    pub kind: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub repeat_minutes: Option<i64>,
}

/// High-level business logic for the `reminder` subcommands.
pub struct ReminderLogic;

impl ReminderLogic {
    /// Validate and store a reminder. Nothing is written when validation fails.
    pub fn add(
        pool: &mut DbPool,
        cfg: &Config,
        draft: ReminderDraft,
        now: i64,
    ) -> AppResult<Reminder> {
        let kind = draft.kind.trim().to_lowercase();
        let repeat = match kind.as_str() {
            "today" => Some(draft.repeat_minutes.unwrap_or(cfg.default_repeat_minutes)),
            _ => None,
        };

        let schedule = ReminderSchedule::from_parts(&kind, draft.date, repeat)?;
        let time = match draft.time {
            Some(t) => t,
            None => parse_time_strict(&cfg.default_reminder_time)?,
        };

        let new = NewReminder::new(draft.category, &draft.title, schedule, time, now)?;
        let id = reminders::insert_reminder(&pool.conn, &new)?;

        ttlog_at(
            &pool.conn,
            now,
            "reminder_add",
            &id.to_string(),
            &format!("{} ({})", new.title, schedule.type_str()),
        )?;

        Self::get(pool, id)
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Reminder> {
        reminders::get_reminder(&pool.conn, id)?.ok_or(AppError::ReminderNotFound(id))
    }

    pub fn list(pool: &DbPool, category: Option<Category>) -> AppResult<Vec<Reminder>> {
        match category {
            Some(c) => reminders::reminders_by_category(&pool.conn, c),
            None => reminders::all_reminders(&pool.conn),
        }
    }

    /// Flip the done flag.
    pub fn toggle_done(pool: &mut DbPool, id: i64, now: i64) -> AppResult<Reminder> {
        let current = Self::get(pool, id)?;
        let patch = ReminderPatch {
            done: Some(!current.done),
            ..ReminderPatch::default()
        };
        Self::apply(pool, id, &patch, now, "reminder_done")
    }

    /// Flip the active flag (pause / resume).
    pub fn toggle_active(pool: &mut DbPool, id: i64, now: i64) -> AppResult<Reminder> {
        let current = Self::get(pool, id)?;
        let patch = ReminderPatch {
            active: Some(!current.active),
            ..ReminderPatch::default()
        };
        Self::apply(pool, id, &patch, now, "reminder_toggle")
    }

    /// Suppress a reminder for `minutes`. A snoozed reminder is open and active again.
    pub fn snooze(pool: &mut DbPool, id: i64, minutes: i64, now: i64) -> AppResult<Reminder> {
        if minutes <= 0 {
            return Err(AppError::Validation(format!(
                "snooze must be at least one minute, got {minutes}"
            )));
        }

        let patch = ReminderPatch {
            active: Some(true),
            done: Some(false),
            snooze_until_ts: Some(Some(now + minutes * MS_PER_MINUTE)),
            ..ReminderPatch::default()
        };
        Self::apply(pool, id, &patch, now, "reminder_snooze")
    }

    pub fn delete(pool: &mut DbPool, id: i64, now: i64) -> AppResult<()> {
        if !reminders::delete_reminder(&pool.conn, id)? {
            return Err(AppError::ReminderNotFound(id));
        }
        ttlog_at(
            &pool.conn,
            now,
            "reminder_del",
            &id.to_string(),
            &format!("Reminder {} deleted", id),
        )?;
        Ok(())
    }

    fn apply(
        pool: &mut DbPool,
        id: i64,
        patch: &ReminderPatch,
        now: i64,
        operation: &str,
    ) -> AppResult<Reminder> {
        if !reminders::update_reminder(&pool.conn, id, patch)? {
            return Err(AppError::ReminderNotFound(id));
        }

        let updated = Self::get(pool, id)?;
        ttlog_at(
            &pool.conn,
            now,
            operation,
            &id.to_string(),
            &format!("{} is now {}", updated.title, updated.status_label()),
        )?;
        Ok(updated)
    }
}
