use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::engine::WINDUP_BODY;
use crate::core::totals::windup_summary;
use crate::errors::AppResult;
use crate::ui::messages::header;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Windup = cmd {
        let (pool, timeline) = open(cfg)?;
        let totals = timeline.daily_totals(&pool)?;

        header(WINDUP_BODY);
        println!("{}", windup_summary(&totals));
    }

    Ok(())
}
