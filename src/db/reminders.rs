//! Reminder store accessor: CRUD and queries over the `reminders` table.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::reminder::{NewReminder, Reminder, ReminderPatch, ReminderSchedule};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const COLUMNS: &str = "id, category_id, title, type, date, time, repeat_minutes, \
                       active, done, last_fired_ts, snooze_until_ts, created_ts";

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<Reminder> {
    let cat_str: String = row.get("category_id")?;
    let category = Category::from_id(&cat_str)
        .ok_or_else(|| conversion_error(1, AppError::InvalidCategory(cat_str.clone())))?;

    let date_str: Option<String> = row.get("date")?;
    let date = match date_str {
        Some(s) => Some(
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| conversion_error(4, AppError::InvalidDate(s.clone())))?,
        ),
        None => None,
    };

    let time_str: String = row.get("time")?;
    let time = NaiveTime::parse_from_str(&time_str, "%H:%M")
        .map_err(|_| conversion_error(5, AppError::InvalidTime(time_str.clone())))?;

    let kind: String = row.get("type")?;
    let schedule = ReminderSchedule::from_parts(&kind, date, row.get("repeat_minutes")?)
        .map_err(|e| conversion_error(3, e))?;

    Ok(Reminder {
        id: row.get("id")?,
        category,
        title: row.get("title")?,
        schedule,
        time,
        active: row.get::<_, i32>("active")? == 1,
        done: row.get::<_, i32>("done")? == 1,
        last_fired_ts: row.get("last_fired_ts")?,
        snooze_until_ts: row.get("snooze_until_ts")?,
        created_ts: row.get("created_ts")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> AppResult<Vec<Reminder>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a new reminder (active, not done, never fired) and return its id.
pub fn insert_reminder(conn: &Connection, r: &NewReminder) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO reminders (category_id, title, type, date, time, repeat_minutes,
                                active, done, last_fired_ts, snooze_until_ts, created_ts)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, 0, NULL, NULL, ?7)",
        params![
            r.category.id(),
            r.title,
            r.schedule.type_str(),
            r.schedule.date().map(|d| d.format("%Y-%m-%d").to_string()),
            r.time.format("%H:%M").to_string(),
            r.schedule.repeat_minutes(),
            r.created_ts,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_reminder(conn: &Connection, id: i64) -> AppResult<Option<Reminder>> {
    let sql = format!("SELECT {COLUMNS} FROM reminders WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Apply a partial update. Returns `false` when no row has that id.
pub fn update_reminder(conn: &Connection, id: i64, patch: &ReminderPatch) -> AppResult<bool> {
    if patch.is_empty() {
        return Ok(get_reminder(conn, id)?.is_some());
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(active) = patch.active {
        sets.push("active = ?");
        args.push(Box::new(active as i32));
    }
    if let Some(done) = patch.done {
        sets.push("done = ?");
        args.push(Box::new(done as i32));
    }
    if let Some(last) = patch.last_fired_ts {
        sets.push("last_fired_ts = ?");
        args.push(Box::new(last));
    }
    if let Some(until) = patch.snooze_until_ts {
        sets.push("snooze_until_ts = ?");
        args.push(Box::new(until));
    }
    args.push(Box::new(id));

    let sql = format!("UPDATE reminders SET {} WHERE id = ?", sets.join(", "));
    let changed = conn.execute(&sql, params_from_iter(args.iter()))?;
    Ok(changed > 0)
}

/// Returns `false` when no row has that id.
pub fn delete_reminder(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM reminders WHERE id = ?1", [id])? > 0)
}

/// Every reminder: open ones first, then by time of day.
pub fn all_reminders(conn: &Connection) -> AppResult<Vec<Reminder>> {
    let sql = format!("SELECT {COLUMNS} FROM reminders ORDER BY done ASC, time ASC, id ASC");
    collect(conn, &sql, &[])
}

/// Reminders eligible for evaluation: active and not done.
pub fn active_reminders(conn: &Connection) -> AppResult<Vec<Reminder>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM reminders
         WHERE active = 1 AND done = 0
         ORDER BY time ASC, id ASC"
    );
    collect(conn, &sql, &[])
}

pub fn reminders_by_category(conn: &Connection, category: Category) -> AppResult<Vec<Reminder>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM reminders
         WHERE category_id = ?1
         ORDER BY done ASC, time ASC, id ASC"
    );
    collect(conn, &sql, &[&category.id()])
}
