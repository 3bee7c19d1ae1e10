use crate::errors::AppResult;
use crate::utils::time::local_from_ms;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

/// Operations written by the timeline whenever the user touches it.
pub const ACTIVITY_OPERATIONS: [&str; 4] = ["start", "switch", "continue", "stop"];

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    write(conn, Local::now(), operation, target, message)
}

/// Same as `ttlog`, stamped with the caller's clock instead of the wall clock.
pub fn ttlog_at(
    conn: &Connection,
    ts: i64,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    write(conn, local_from_ms(ts)?, operation, target, message)
}

fn write(
    conn: &Connection,
    when: DateTime<Local>,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![when.to_rfc3339(), operation, target, message])?;

    Ok(())
}

/// Timestamp (ms) of the newest timeline activity in the log, if any.
pub fn last_activity_ts(conn: &Connection) -> AppResult<Option<i64>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT date FROM log
             WHERE operation IN (?1, ?2, ?3, ?4)
             ORDER BY id DESC
             LIMIT 1",
            params![
                ACTIVITY_OPERATIONS[0],
                ACTIVITY_OPERATIONS[1],
                ACTIVITY_OPERATIONS[2],
                ACTIVITY_OPERATIONS[3]
            ],
            |row| row.get(0),
        )
        .optional()?;

    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.timestamp_millis()))
}

/// One row of the `log` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn map_entry(row: &Row) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        operation: row.get(2)?,
        target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        message: row.get(4)?,
    })
}

/// Log rows, oldest first. With `activity_only`, just the timeline operations.
pub fn load_log(conn: &Connection, activity_only: bool) -> AppResult<Vec<LogEntry>> {
    let rows = if activity_only {
        let mut stmt = conn.prepare(
            "SELECT id, date, operation, target, message FROM log
             WHERE operation IN (?1, ?2, ?3, ?4)
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params_from_iter(ACTIVITY_OPERATIONS.iter()), map_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    } else {
        let mut stmt =
            conn.prepare("SELECT id, date, operation, target, message FROM log ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], map_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };
    Ok(rows)
}
