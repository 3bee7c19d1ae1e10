use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};

const V_BLOCKS: &str = "20250601_0001_create_blocks_and_settings";
const V_REMINDERS: &str = "20250715_0002_create_reminders";

/// Ensure that the `log` table exists with the modern schema.
/// It doubles as the migration ledger (`operation = 'migration_applied'`).
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_log_operation ON log(operation);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![chrono::Local::now().to_rfc3339(), version, message],
    )?;
    Ok(())
}

/// Run one migration body inside a transaction and record it in the ledger.
fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> AppResult<()> {
    if is_applied(conn, version)? {
        return Ok(());
    }

    let batch = format!("BEGIN;\n{sql}\nCOMMIT;");
    if let Err(e) = conn.execute_batch(&batch) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{version}: {e}")));
    }

    mark_applied(conn, version, message)?;
    success(format!("Migration applied: {} → {}", version, message));
    Ok(())
}

/// Blocks of tracked time plus the key/value settings table.
fn create_blocks_and_settings(conn: &Connection) -> AppResult<()> {
    apply(
        conn,
        V_BLOCKS,
        "Created blocks and settings tables",
        r#"
        CREATE TABLE IF NOT EXISTS blocks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id  TEXT NOT NULL,
            start_ts     INTEGER NOT NULL,
            end_ts       INTEGER,
            note         TEXT NOT NULL DEFAULT '',
            day_key      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_blocks_category ON blocks(category_id);
        CREATE INDEX IF NOT EXISTS idx_blocks_start ON blocks(start_ts);
        CREATE INDEX IF NOT EXISTS idx_blocks_end ON blocks(end_ts);
        CREATE INDEX IF NOT EXISTS idx_blocks_day ON blocks(day_key, start_ts);

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
}

/// User-defined reminders (schema version 2).
fn create_reminders(conn: &Connection) -> AppResult<()> {
    apply(
        conn,
        V_REMINDERS,
        "Created reminders table",
        r#"
        CREATE TABLE IF NOT EXISTS reminders (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id     TEXT NOT NULL,
            title           TEXT NOT NULL,
            type            TEXT NOT NULL CHECK(type IN ('today','date','monthly')),
            date            TEXT,
            time            TEXT NOT NULL,
            repeat_minutes  INTEGER,
            active          INTEGER NOT NULL DEFAULT 1,
            done            INTEGER NOT NULL DEFAULT 0,
            last_fired_ts   INTEGER,
            snooze_until_ts INTEGER,
            created_ts      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reminders_category ON reminders(category_id);
        CREATE INDEX IF NOT EXISTS idx_reminders_type_date ON reminders(type, date);
        CREATE INDEX IF NOT EXISTS idx_reminders_state ON reminders(active, done);
        "#,
    )
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    create_blocks_and_settings(conn)?;
    create_reminders(conn)?;
    Ok(())
}
