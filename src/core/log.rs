//! Pretty printer for the internal audit log.

use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 60;

/// Colour of an audit-log operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" | "switch" => Colour::Green,
        "continue" => Colour::Cyan,
        "stop" => Colour::Blue,
        "del" | "clear" | "reminder_del" => Colour::Red,
        "edit" | "note" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" | "settings" | "export" => Colour::RGB(255, 153, 51),
        other if other.starts_with("reminder_") => Colour::Purple,
        _ => Colour::White,
    }
}

/// `operation (target)`, truncated to `MAX_OP_WIDTH` characters.
fn op_label(e: &LogEntry) -> String {
    let label = if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    };

    if label.chars().count() > MAX_OP_WIDTH {
        let mut s: String = label.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label
    }
}

/// RFC 3339 with second precision; unparsable dates are shown as stored.
fn short_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, activity_only: bool) -> AppResult<()> {
        let entries = load_log(&pool.conn, activity_only)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let rows: Vec<(&LogEntry, String, String)> = entries
            .iter()
            .map(|e| (e, short_date(&e.date), op_label(e)))
            .collect();

        let id_w = rows.iter().map(|(e, _, _)| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|(_, d, _)| d.len()).max().unwrap_or(0);
        let op_w = rows.iter().map(|(_, _, l)| l.chars().count()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (e, date, label) in rows {
            let color = color_for_operation(&e.operation);

            // only the operation word is coloured
            let colored = match label.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(label.as_str()).to_string(),
            };
            let visible = ansi.replace_all(&colored, "").chars().count();
            let padding = " ".repeat(op_w.saturating_sub(visible));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                date,
                colored,
                padding,
                e.message.replace('\n', " / "),
            );
        }

        Ok(())
    }
}
