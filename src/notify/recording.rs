use super::{Notification, Notifier, Permission};
use crate::errors::{AppError, AppResult};
use std::sync::{Arc, Mutex};

/// Keeps notifications in memory instead of showing them.
/// Clones share the same log, so a test can hand one to the engine and
/// inspect the other.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    permission: Arc<Mutex<Permission>>,
    failing: Arc<Mutex<bool>>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::with_permission(Permission::Granted)
    }
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permission(permission: Permission) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            permission: Arc::new(Mutex::new(permission)),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_permission(&self, permission: Permission) {
        if let Ok(mut p) = self.permission.lock() {
            *p = permission;
        }
    }

    /// Make every following `show` fail like a broken transport.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut f) = self.failing.lock() {
            *f = failing;
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Notifications whose metadata `type` equals `kind`.
    pub fn count_of(&self, kind: &str) -> usize {
        self.sent()
            .iter()
            .filter(|n| n.data.get("type").and_then(|t| t.as_str()) == Some(kind))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.sent.lock() {
            v.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Unsupported)
    }

    fn request_permission(&mut self) -> Permission {
        self.permission()
    }

    fn show(&self, notification: &Notification) -> AppResult<()> {
        if self.failing.lock().map(|f| *f).unwrap_or(false) {
            return Err(AppError::Notification("simulated transport failure".into()));
        }

        self.sent
            .lock()
            .map_err(|_| AppError::Notification("recording log poisoned".into()))?
            .push(notification.clone());
        Ok(())
    }
}
