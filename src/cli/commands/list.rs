use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::block::ActivityBlock;
use crate::utils::date;
use crate::utils::formatting::{bold, mins2readable, state_pill, wrap_note};
use crate::utils::table::{Column, Table};
use crate::utils::time::{fmt_range, minutes_between};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { date: d } = cmd {
        let (pool, timeline) = open(cfg)?;

        let day_key = match d {
            Some(s) => {
                let parsed = date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?;
                date::fmt_date(&parsed)
            }
            None => timeline.today_key()?,
        };

        let blocks = timeline.blocks_for_day(&pool, &day_key)?;
        if blocks.is_empty() {
            println!("No blocks for {}", day_key);
            return Ok(());
        }

        println!("📅 {}\n", bold(&day_key));
        print_blocks(&blocks, timeline.now(), cfg.wrap_width);
    }

    Ok(())
}

fn print_blocks(blocks: &[ActivityBlock], now: i64, wrap_width: usize) {
    let mut table = Table::new(vec![
        Column::new("ID", 3),
        Column::new("STATE", 9),
        Column::new("TIME", 13),
        Column::new("CATEGORY", 8),
        Column::new("DURATION", 8),
    ]);

    for b in blocks {
        table.add_row(vec![
            b.id.to_string(),
            format!("[{}]", b.state.label()),
            fmt_range(b.start_ts, b.state.end_ts()),
            b.category.name().to_string(),
            mins2readable(minutes_between(b.start_ts, b.end_or(now)), false),
        ]);
    }
    table.fit();

    let rendered = table.render();
    let mut lines = rendered.lines();
    if let Some(header) = lines.next() {
        println!("{}", bold(header.trim_end()));
    }

    // same order as the table rows
    for (line, b) in lines.zip(blocks) {
        let plain = format!("[{}]", b.state.label());
        let line = line.replacen(&plain, &state_pill(&b.state), 1);
        println!("{}", line.trim_end());
        if !b.note.is_empty() {
            println!("    📝 {}", wrap_note(&b.note, wrap_width, "       "));
        }
    }
}
