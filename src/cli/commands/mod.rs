pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod note;
pub mod notify;
pub mod reminder;
pub mod settings;
pub mod start;
pub mod stats;
pub mod status;
pub mod stop;
pub mod watch;
pub mod windup;

use crate::config::Config;
use crate::core::clock::{SharedClock, SystemClock};
use crate::core::timeline::Timeline;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use std::io::{self, Write};
use std::sync::Arc;

/// Open the configured database and a timeline on the wall clock.
pub(crate) fn open(cfg: &Config) -> AppResult<(DbPool, Timeline)> {
    let pool = DbPool::open_initialized(&cfg.database)?;
    let clock: SharedClock = Arc::new(SystemClock);
    Ok((pool, Timeline::new(clock)))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
