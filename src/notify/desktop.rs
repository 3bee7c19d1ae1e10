use super::{Notification, Notifier, Permission};
use crate::errors::{AppError, AppResult};
use notify_rust::Notification as Toast;

const APP_NAME: &str = "rdaytracker";

/// Native desktop notifications (freedesktop on Linux/BSD, Notification
/// Center on macOS, toasts on Windows).
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    granted: bool,
}

impl DesktopNotifier {
    /// `granted` is the persisted outcome of an earlier permission request.
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }

    pub fn supported() -> bool {
        cfg!(any(unix, windows))
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        match (Self::supported(), self.granted) {
            (false, _) => Permission::Unsupported,
            (true, true) => Permission::Granted,
            (true, false) => Permission::Denied,
        }
    }

    fn request_permission(&mut self) -> Permission {
        if Self::supported() {
            self.granted = true;
        }
        self.permission()
    }

    fn show(&self, notification: &Notification) -> AppResult<()> {
        Toast::new()
            .summary(&notification.title)
            .body(&notification.body)
            .appname(APP_NAME)
            .show()
            .map(|_| ())
            .map_err(|e| AppError::Notification(e.to_string()))
    }
}
