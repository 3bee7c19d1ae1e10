use serde::{Deserialize, Serialize};

pub const KEY_IDLE_MINUTES: &str = "idleMinutes";
pub const KEY_WINDUP_TIME: &str = "windupTime";
pub const KEY_REMINDERS_ENABLED: &str = "remindersEnabled";
pub const KEY_NOTIFICATIONS_GRANTED: &str = "notificationsGranted";

/// Runtime settings stored in the `settings` table.
/// Missing rows fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub idle_minutes: i64,
    pub windup_time: String,
    pub reminders_enabled: bool,
    pub notifications_granted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            idle_minutes: 30,
            windup_time: "21:45".to_string(),
            reminders_enabled: true,
            notifications_granted: false,
        }
    }
}
