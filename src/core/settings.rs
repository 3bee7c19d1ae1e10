use crate::db::log::ttlog_at;
use crate::db::pool::DbPool;
use crate::db::settings::{load_settings, save_settings};
use crate::errors::{AppError, AppResult};
use crate::models::settings::Settings;
use crate::utils::time::parse_time_strict;

/// Requested changes; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsChange {
    pub idle_minutes: Option<i64>,
    pub windup_time: Option<String>,
    pub reminders_enabled: Option<bool>,
    pub notifications_granted: Option<bool>,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        self.idle_minutes.is_none()
            && self.windup_time.is_none()
            && self.reminders_enabled.is_none()
            && self.notifications_granted.is_none()
    }
}

pub struct SettingsLogic;

impl SettingsLogic {
    /// Validate and persist. A running `watch` picks the change up on its next poll.
    pub fn update(pool: &mut DbPool, change: SettingsChange, now: i64) -> AppResult<Settings> {
        let mut s = load_settings(&pool.conn)?;

        if let Some(idle) = change.idle_minutes {
            if idle < 1 {
                return Err(AppError::Validation(format!(
                    "idle minutes must be at least 1, got {idle}"
                )));
            }
            s.idle_minutes = idle;
        }
        if let Some(t) = &change.windup_time {
            s.windup_time = parse_time_strict(t)?.format("%H:%M").to_string();
        }
        if let Some(enabled) = change.reminders_enabled {
            s.reminders_enabled = enabled;
        }
        if let Some(granted) = change.notifications_granted {
            s.notifications_granted = granted;
        }

        if !change.is_empty() {
            save_settings(&pool.conn, &s)?;
            ttlog_at(
                &pool.conn,
                now,
                "settings",
                "",
                &format!(
                    "idle={} windup={} reminders={} notifications={}",
                    s.idle_minutes, s.windup_time, s.reminders_enabled, s.notifications_granted
                ),
            )?;
        }

        Ok(s)
    }
}
