use rdaytracker::notify::{
    self, Delivery, DesktopNotifier, Notification, Notifier, Permission, RecordingNotifier,
    dispatch,
};
use serde_json::json;

fn sample() -> Notification {
    Notification::new("Day Tracker", "Work: stand up", json!({ "type": "reminder", "id": 1 }))
}

#[cfg(any(unix, windows))]
#[test]
fn desktop_permission_follows_the_stored_grant() {
    assert!(DesktopNotifier::supported());
    assert_eq!(DesktopNotifier::new(true).permission(), Permission::Granted);

    let mut notifier = DesktopNotifier::new(false);
    assert_eq!(notifier.permission(), Permission::Denied);
    assert_eq!(notifier.request_permission(), Permission::Granted);
    assert_eq!(notifier.permission(), Permission::Granted);
}

#[test]
fn denied_desktop_notifier_never_shows_anything() {
    let notifier = DesktopNotifier::new(false);
    assert_eq!(dispatch(&notifier, &sample()), Delivery::Skipped);
}

#[test]
fn console_backend_is_always_granted() {
    let notifier = notify::from_config(" Console ", false);
    assert_eq!(notifier.permission(), Permission::Granted);
}

#[test]
fn dispatch_reports_each_outcome() {
    let recorder = RecordingNotifier::new();
    assert_eq!(dispatch(&recorder, &sample()), Delivery::Delivered);
    assert_eq!(recorder.count_of("reminder"), 1);

    recorder.set_failing(true);
    assert_eq!(dispatch(&recorder, &sample()), Delivery::Failed);

    recorder.set_permission(Permission::Unsupported);
    assert_eq!(dispatch(&recorder, &sample()), Delivery::Skipped);
    assert_eq!(recorder.count(), 1);
}
