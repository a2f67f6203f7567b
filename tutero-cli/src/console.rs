use colored::Colorize;
use tutero::{Notification, NotificationKind, Notifier};

/// Prints notifications to stdout, one headline plus indented detail lines.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let headline = match notification.kind {
            NotificationKind::Success => format!("✅ {}", notification.title).green().bold(),
            NotificationKind::Failure => format!("❌ {}", notification.title).red().bold(),
        };
        println!("{headline}");
        if let Some(message) = notification.message {
            for line in message.lines() {
                println!("   {line}");
            }
        }
    }
}
