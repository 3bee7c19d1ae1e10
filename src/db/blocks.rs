//! Block store accessor: CRUD and range queries over the `blocks` table.

use crate::errors::{AppError, AppResult};
use crate::models::block::{ActivityBlock, BlockPatch, BlockState, NewBlock};
use crate::models::category::Category;
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const COLUMNS: &str = "id, category_id, start_ts, end_ts, note, day_key";

pub fn map_row(row: &Row) -> Result<ActivityBlock> {
    let cat_str: String = row.get("category_id")?;
    let category = Category::from_id(&cat_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(AppError::InvalidCategory(cat_str.clone())),
        )
    })?;

    Ok(ActivityBlock {
        id: row.get("id")?,
        category,
        start_ts: row.get("start_ts")?,
        state: BlockState::from_end_ts(row.get("end_ts")?),
        note: row.get("note")?,
        day_key: row.get("day_key")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> AppResult<Vec<ActivityBlock>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a block and return the id assigned by SQLite.
pub fn insert_block(conn: &Connection, block: &NewBlock) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO blocks (category_id, start_ts, end_ts, note, day_key)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            block.category.id(),
            block.start_ts,
            block.state.end_ts(),
            block.note,
            block.day_key,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_block(conn: &Connection, id: i64) -> AppResult<Option<ActivityBlock>> {
    let sql = format!("SELECT {COLUMNS} FROM blocks WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Apply a partial update. Returns `false` when no row has that id.
pub fn update_block(conn: &Connection, id: i64, patch: &BlockPatch) -> AppResult<bool> {
    if patch.is_empty() {
        return Ok(get_block(conn, id)?.is_some());
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(cat) = patch.category {
        sets.push("category_id = ?");
        args.push(Box::new(cat.id()));
    }
    if let Some(start) = patch.start_ts {
        sets.push("start_ts = ?");
        args.push(Box::new(start));
    }
    if let Some(state) = patch.state {
        sets.push("end_ts = ?");
        args.push(Box::new(state.end_ts()));
    }
    if let Some(note) = &patch.note {
        sets.push("note = ?");
        args.push(Box::new(note.clone()));
    }
    if let Some(day_key) = &patch.day_key {
        sets.push("day_key = ?");
        args.push(Box::new(day_key.clone()));
    }
    args.push(Box::new(id));

    let sql = format!("UPDATE blocks SET {} WHERE id = ?", sets.join(", "));
    let changed = conn.execute(&sql, params_from_iter(args.iter()))?;
    Ok(changed > 0)
}

/// Returns `false` when no row has that id.
pub fn delete_block(conn: &Connection, id: i64) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM blocks WHERE id = ?1", [id])? > 0)
}

/// Bulk delete by id set. Returns the number of removed rows.
pub fn delete_blocks(conn: &Connection, ids: &[i64]) -> AppResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    // one placeholder per id
    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!("DELETE FROM blocks WHERE id IN ({placeholders})");
    Ok(conn.execute(&sql, params_from_iter(ids.iter()))?)
}

/// All blocks of a local day, oldest first.
pub fn blocks_by_day_key(conn: &Connection, day_key: &str) -> AppResult<Vec<ActivityBlock>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM blocks
         WHERE day_key = ?1
         ORDER BY start_ts ASC, id ASC"
    );
    collect(conn, &sql, &[&day_key])
}

pub fn block_ids_by_day_key(conn: &Connection, day_key: &str) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM blocks WHERE day_key = ?1")?;
    let rows = stmt.query_map([day_key], |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The block without an end time, if any.
pub fn running_block(conn: &Connection) -> AppResult<Option<ActivityBlock>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM blocks
         WHERE end_ts IS NULL
         ORDER BY start_ts DESC, id DESC
         LIMIT 1"
    );
    Ok(conn.query_row(&sql, [], map_row).optional()?)
}

pub fn count_running(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM blocks WHERE end_ts IS NULL",
        [],
        |row| row.get(0),
    )?)
}

/// The most recently started block of a day.
pub fn latest_block_for_day(conn: &Connection, day_key: &str) -> AppResult<Option<ActivityBlock>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM blocks
         WHERE day_key = ?1
         ORDER BY start_ts DESC, id DESC
         LIMIT 1"
    );
    Ok(conn.query_row(&sql, [day_key], map_row).optional()?)
}

pub fn blocks_by_category(conn: &Connection, category: Category) -> AppResult<Vec<ActivityBlock>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM blocks
         WHERE category_id = ?1
         ORDER BY start_ts ASC"
    );
    collect(conn, &sql, &[&category.id()])
}
