use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::watch::{WatchLogic, WatchOptions};
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { once, console } = cmd {
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        WatchLogic::run(
            &mut pool,
            cfg,
            WatchOptions {
                once: *once,
                console: *console,
            },
        )?;
    }

    Ok(())
}
