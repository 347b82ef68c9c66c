//! Terminal renditions of the notification and navigation collaborators.

use pitchside_types::{Navigator, Notification, NotificationSink};
use pitchside_workflow::FormErrors;

/// Prints notifications to stderr.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, destructive = notification.is_destructive(), "notification");
        if notification.is_destructive() {
            eprintln!("error: {}: {}", notification.title, notification.description);
        } else {
            eprintln!("{}: {}", notification.title, notification.description);
        }
    }
}

/// There are no screens to move between; a redirect to the login path
/// becomes a hint to sign in again.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(path, "session expired");
        eprintln!("session expired, run `pitchside login` to sign in again");
    }
}

/// Print field errors left on a form by a rejected submission.
pub fn print_form_errors(form: &FormErrors) {
    for (field, error) in form.snapshot() {
        eprintln!("  {field}: {}", error.message);
    }
}
