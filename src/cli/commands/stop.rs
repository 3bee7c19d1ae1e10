use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timeline::StopOutcome;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop = cmd {
        let (mut pool, mut timeline) = open(cfg)?;

        match timeline.stop(&mut pool)? {
            StopOutcome::Stopped { closed } => success(format!("Block {} stopped.", closed)),
            StopOutcome::AlreadyIdle => info("Nothing is running."),
        }
    }

    Ok(())
}
