use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    let blocks: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;
    let reminders: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
    let active: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM reminders WHERE active = 1 AND done = 0",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Total blocks:{} {}{}{}", CYAN, RESET, GREEN, blocks, RESET);
    println!(
        "{}• Reminders:{} {}{}{} ({} active)",
        CYAN, RESET, GREEN, reminders, RESET, active
    );

    //
    // 3) DAY RANGE
    //
    let first_day: Option<String> = pool
        .conn
        .query_row(
            "SELECT day_key FROM blocks ORDER BY day_key ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_day: Option<String> = pool
        .conn
        .query_row(
            "SELECT day_key FROM blocks ORDER BY day_key DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let days: i64 = pool.conn.query_row(
        "SELECT COUNT(DISTINCT day_key) FROM blocks",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Day range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first_day.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last_day.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) AVERAGE BLOCKS/DAY
    //
    if days > 0 {
        let avg = blocks as f64 / days as f64;
        println!("{}• Average blocks/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
