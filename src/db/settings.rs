//! Settings store accessor: JSON-encoded values keyed by name.

use crate::errors::AppResult;
use crate::models::settings::{
    KEY_IDLE_MINUTES, KEY_NOTIFICATIONS_GRANTED, KEY_REMINDERS_ENABLED, KEY_WINDUP_TIME, Settings,
};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::collections::HashMap;

pub fn get_setting(conn: &Connection, key: &str) -> AppResult<Option<Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

/// Insert or replace one setting.
pub fn save_setting(conn: &Connection, key: &str, value: &Value) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

fn all_settings(conn: &Connection) -> AppResult<HashMap<String, Value>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = HashMap::new();
    for r in rows {
        let (key, raw) = r?;
        out.insert(key, serde_json::from_str(&raw)?);
    }
    Ok(out)
}

/// Stored settings merged over the defaults.
/// Values of the wrong JSON type are ignored in favour of the default.
pub fn load_settings(conn: &Connection) -> AppResult<Settings> {
    let stored = all_settings(conn)?;
    let mut s = Settings::default();

    if let Some(v) = stored.get(KEY_IDLE_MINUTES).and_then(Value::as_i64) {
        s.idle_minutes = v;
    }
    if let Some(v) = stored.get(KEY_WINDUP_TIME).and_then(Value::as_str) {
        s.windup_time = v.to_string();
    }
    if let Some(v) = stored.get(KEY_REMINDERS_ENABLED).and_then(Value::as_bool) {
        s.reminders_enabled = v;
    }
    if let Some(v) = stored.get(KEY_NOTIFICATIONS_GRANTED).and_then(Value::as_bool) {
        s.notifications_granted = v;
    }

    Ok(s)
}

pub fn save_settings(conn: &Connection, s: &Settings) -> AppResult<()> {
    save_setting(conn, KEY_IDLE_MINUTES, &Value::from(s.idle_minutes))?;
    save_setting(conn, KEY_WINDUP_TIME, &Value::from(s.windup_time.clone()))?;
    save_setting(conn, KEY_REMINDERS_ENABLED, &Value::from(s.reminders_enabled))?;
    save_setting(
        conn,
        KEY_NOTIFICATIONS_GRANTED,
        &Value::from(s.notifications_granted),
    )?;
    Ok(())
}
