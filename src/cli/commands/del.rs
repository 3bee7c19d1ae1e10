use super::{ask_confirmation, open};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, today } = cmd {
        let (mut pool, mut timeline) = open(cfg)?;

        if *today {
            let day_key = timeline.today_key()?;
            let prompt = format!(
                "Delete ALL blocks for {}? This action is irreversible.",
                day_key
            );

            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = timeline.clear_day(&mut pool, &day_key)?;
            success(format!("{} block(s) deleted for {}.", removed, day_key));
            return Ok(());
        }

        if let Some(id) = id {
            if !timeline.delete_block(&mut pool, *id)? {
                return Err(AppError::BlockNotFound(*id));
            }
            success(format!("Block {} deleted.", id));
        }
    }

    Ok(())
}
