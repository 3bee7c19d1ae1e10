use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timeline::SwitchOutcome;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::ui::messages::{info, success};
use crate::utils::time::fmt_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start { category } = cmd {
        let category = Category::parse(category)?;
        let (mut pool, mut timeline) = open(cfg)?;

        let at = fmt_time(timeline.now());
        match timeline.start_or_switch(&mut pool, category)? {
            SwitchOutcome::Started { opened } => {
                success(format!("{} started at {} (block {}).", category.name(), at, opened));
            }
            SwitchOutcome::Switched { closed, opened } => {
                success(format!(
                    "Block {} closed. {} started at {} (block {}).",
                    closed,
                    category.name(),
                    at,
                    opened
                ));
            }
            SwitchOutcome::Continued { block } => {
                info(format!("Still on {} (block {}).", category.name(), block));
            }
        }
    }

    Ok(())
}
