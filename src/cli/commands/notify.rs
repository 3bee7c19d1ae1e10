use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings::{SettingsChange, SettingsLogic};
use crate::db::settings::load_settings;
use crate::errors::AppResult;
use crate::notify::{self, Delivery, Notification, Permission, dispatch};
use crate::ui::messages::{info, success, warning};
use serde_json::json;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Notify { enable, test } = cmd {
        let (mut pool, timeline) = open(cfg)?;
        let settings = load_settings(&pool.conn)?;
        let mut notifier = notify::from_config(&cfg.notifier, settings.notifications_granted);

        if *enable {
            let permission = notifier.request_permission();
            SettingsLogic::update(
                &mut pool,
                SettingsChange {
                    notifications_granted: Some(permission == Permission::Granted),
                    ..SettingsChange::default()
                },
                timeline.now(),
            )?;

            match permission {
                Permission::Granted => success("Notifications enabled."),
                other => warning(format!("Notifications {}.", other)),
            }
        }

        if *test {
            let n = Notification::new(
                cfg.app_title.clone(),
                "Test notification",
                json!({ "type": "test" }),
            );
            match dispatch(notifier.as_ref(), &n) {
                Delivery::Delivered => success("Test notification sent."),
                Delivery::Skipped => warning(format!(
                    "Notifications {}: nothing was sent.",
                    notifier.permission()
                )),
                Delivery::Failed => warning("The notification backend reported an error."),
            }
        }

        if !*enable && !*test {
            info(format!("Notifications: {}", notifier.permission()));
        }
    }

    Ok(())
}
