use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::colors::{RESET, color_for_percent};
use crate::utils::formatting::{bold, dimmed, mins2readable};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats = cmd {
        let (pool, timeline) = open(cfg)?;
        let totals = timeline.daily_totals(&pool)?;

        println!("📊 Totals for {}\n", bold(&totals.day_key));

        if totals.by_category.is_empty() {
            println!("{}", dimmed("No data yet."));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("CATEGORY", 8),
            Column::new("TIME", 8),
            Column::new("MIN", 4),
            Column::new("SHARE", 5),
        ]);
        for t in &totals.by_category {
            table.add_row(vec![
                t.category.name().to_string(),
                mins2readable(t.minutes, false),
                t.minutes.to_string(),
                format!("{}%", t.percent),
            ]);
        }
        table.fit();

        let rendered = table.render();
        let mut lines = rendered.lines();
        if let Some(h) = lines.next() {
            println!("{}", bold(h.trim_end()));
        }
        for (line, t) in lines.zip(&totals.by_category) {
            println!("{}{}{}", color_for_percent(t.percent), line.trim_end(), RESET);
        }

        println!();
        println!("Tracked:   {}", mins2readable(totals.tracked_minutes, false));
        println!("Untracked: {}", mins2readable(totals.untracked_minutes, false));
    }

    Ok(())
}
