use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Note { text } = cmd {
        let (mut pool, mut timeline) = open(cfg)?;

        match timeline.append_note(&mut pool, &text.join(" "))? {
            Some(id) => success(format!("Note added to block {}.", id)),
            None => warning("No block today to attach the note to."),
        }
    }

    Ok(())
}
