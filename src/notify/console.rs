use super::{Notification, Notifier, Permission};
use crate::errors::AppResult;
use crate::ui::messages::bell;

/// Prints notifications on stdout. Always allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn show(&self, notification: &Notification) -> AppResult<()> {
        bell(&notification.title, &notification.body);
        Ok(())
    }
}
