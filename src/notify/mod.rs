//! Notification dispatcher.
//!
//! Delivery is fire-and-forget: without a granted permission every dispatch
//! is a silent no-op, and transport failures are logged and swallowed. Callers
//! behave identically whether or not anything reached the user.

mod console;
mod desktop;
mod recording;

pub use console::ConsoleNotifier;
pub use desktop::DesktopNotifier;
pub use recording::RecordingNotifier;

use crate::errors::AppResult;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Unsupported,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Unsupported => "not supported",
        };
        f.write_str(s)
    }
}

/// What gets shown, plus metadata for whoever handles a click.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub data: Value,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, data: Value) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data,
        }
    }
}

pub trait Notifier: Send {
    fn permission(&self) -> Permission;

    /// Ask the platform for permission; returns the resulting state.
    fn request_permission(&mut self) -> Permission;

    /// Deliver one notification. Only called with permission granted.
    fn show(&self, notification: &Notification) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Permission not granted or platform unsupported.
    Skipped,
    /// The transport reported an error; nothing was retried.
    Failed,
}

/// Best-effort delivery. Never returns an error.
pub fn dispatch(notifier: &dyn Notifier, notification: &Notification) -> Delivery {
    let permission = notifier.permission();
    if permission != Permission::Granted {
        debug!(%permission, title = %notification.title, "notification skipped");
        return Delivery::Skipped;
    }

    match notifier.show(notification) {
        Ok(()) => {
            debug!(body = %notification.body, data = %notification.data, "notification shown");
            Delivery::Delivered
        }
        Err(e) => {
            warn!(error = %e, body = %notification.body, "notification delivery failed");
            Delivery::Failed
        }
    }
}

/// Build the notifier named in the configuration.
/// Unknown names fall back to the desktop backend.
pub fn from_config(name: &str, granted: bool) -> Box<dyn Notifier> {
    match name.trim().to_lowercase().as_str() {
        "console" => Box::new(ConsoleNotifier),
        _ => Box::new(DesktopNotifier::new(granted)),
    }
}
