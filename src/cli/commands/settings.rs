use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings::{SettingsChange, SettingsLogic};
use crate::errors::AppResult;
use crate::models::settings::Settings;
use crate::ui::messages::success;

fn print_settings(s: &Settings) {
    println!("idleMinutes          : {}", s.idle_minutes);
    println!("windupTime           : {}", s.windup_time);
    println!("remindersEnabled     : {}", s.reminders_enabled);
    println!("notificationsGranted : {}", s.notifications_granted);
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings {
        idle,
        windup,
        enable,
        disable,
    } = cmd
    {
        let (mut pool, timeline) = open(cfg)?;

        let change = SettingsChange {
            idle_minutes: *idle,
            windup_time: windup.clone(),
            reminders_enabled: match (*enable, *disable) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            notifications_granted: None,
        };
        let changed = !change.is_empty();

        let s = SettingsLogic::update(&mut pool, change, timeline.now())?;
        if changed {
            success("Settings saved.");
        }
        print_settings(&s);
    }

    Ok(())
}
