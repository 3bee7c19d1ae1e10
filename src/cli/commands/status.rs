use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::settings::load_settings;
use crate::errors::AppResult;
use crate::notify;
use crate::utils::formatting::{mins2readable, state_pill};
use crate::utils::time::{fmt_time, minutes_between};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status = cmd {
        let (pool, timeline) = open(cfg)?;
        let now = timeline.now();

        match timeline.running(&pool)? {
            Some(b) => println!(
                "{} {} since {} ({})",
                state_pill(&b.state),
                b.category.name(),
                fmt_time(b.start_ts),
                mins2readable(minutes_between(b.start_ts, now), false)
            ),
            None => println!("⏸  Idle: nothing is running."),
        }

        let settings = load_settings(&pool.conn)?;
        let notifier = notify::from_config(&cfg.notifier, settings.notifications_granted);

        println!(
            "🔔 Reminders: {} (idle {} min, wind-up {})",
            if settings.reminders_enabled { "on" } else { "off" },
            settings.idle_minutes,
            settings.windup_time
        );
        println!("📣 Notifications: {}", notifier.permission());
    }

    Ok(())
}
