//! The long-lived process that drives the reminder engine on the wall clock.

use crate::config::Config;
use crate::core::clock::{SharedClock, SystemClock};
use crate::core::engine::{EngineConfig, Fire, ReminderEngine};
use crate::core::scheduler::TaskKind;
use crate::core::timeline::Timeline;
use crate::db::pool::DbPool;
use crate::db::settings::load_settings;
use crate::errors::AppResult;
use crate::models::settings::Settings;
use crate::notify::{self, ConsoleNotifier, Notifier};
use crate::ui::messages::{info, warning};
use crate::utils::time::fmt_time;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound of one sleep; settings are re-read at least this often.
const SETTINGS_POLL_MS: i64 = 5_000;
const MIN_SLEEP_MS: i64 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    /// Evaluate once and exit.
    pub once: bool,
    /// Print notifications instead of using the desktop backend.
    pub console: bool,
}

fn build_notifier(cfg: &Config, settings: &Settings, opts: WatchOptions) -> Box<dyn Notifier> {
    if opts.console {
        Box::new(ConsoleNotifier)
    } else {
        notify::from_config(&cfg.notifier, settings.notifications_granted)
    }
}

fn report(fires: &[Fire]) {
    for f in fires {
        debug!(at = %fmt_time(f.at), kind = ?f.kind, delivery = ?f.delivery, "fire");
    }
}

pub struct WatchLogic;

impl WatchLogic {
    pub fn run(pool: &mut DbPool, cfg: &Config, opts: WatchOptions) -> AppResult<()> {
        let clock: SharedClock = Arc::new(SystemClock);
        let mut settings = load_settings(&pool.conn)?;

        let mut timeline = Timeline::new(clock.clone());
        let mut engine = ReminderEngine::new(clock.clone(), build_notifier(cfg, &settings, opts));
        let mut current = EngineConfig::from_settings(&settings, cfg)?;
        engine.start(current.clone())?;

        if !current.enabled {
            warning("Reminders are disabled (settings --enable to turn them on).");
        }
        info(format!(
            "Notifications: {}",
            engine.permission()
        ));

        if opts.once {
            let fires = engine.run_now(&[TaskKind::Idle, TaskKind::Evaluate], pool, &mut timeline);
            report(&fires);
            info(format!("{} notification(s) fired.", fires.len()));
            engine.stop();
            return Ok(());
        }

        info(format!(
            "Watching (idle {} min, wind-up {}). Press Ctrl-C to stop.",
            current.idle_minutes,
            current.windup_time.format("%H:%M")
        ));

        loop {
            // Hot reload: any settings change cancels and re-arms every task.
            match load_settings(&pool.conn)
                .and_then(|s| EngineConfig::from_settings(&s, cfg).map(|c| (s, c)))
            {
                Ok((next_settings, next)) => {
                    if next_settings.notifications_granted != settings.notifications_granted {
                        engine.set_notifier(build_notifier(cfg, &next_settings, opts));
                    }
                    if next != current {
                        match engine.reconfigure(next.clone()) {
                            Ok(()) => {
                                info(format!(
                                    "Settings changed: reminders {}.",
                                    if next.enabled { "re-armed" } else { "disabled" }
                                ));
                                current = next;
                            }
                            Err(e) => warn!(error = %e, "could not apply new settings"),
                        }
                    }
                    settings = next_settings;
                }
                Err(e) => warn!(error = %e, "could not reload settings"),
            }

            let fires = engine.tick(pool, &mut timeline);
            report(&fires);

            let now = clock.now_ms();
            let sleep_ms = engine
                .next_wakeup()
                .map(|due| (due - now).clamp(MIN_SLEEP_MS, SETTINGS_POLL_MS))
                .unwrap_or(SETTINGS_POLL_MS);
            thread::sleep(Duration::from_millis(sleep_ms as u64));
        }
    }
}
