use deepscan_engine::{Notification, NotificationSink, Verdict};

/// Prints notifications as they arrive; destructive ones go to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        let line = format_notification(&notification);
        if notification.is_destructive() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

pub fn format_notification(n: &Notification) -> String {
    if n.is_destructive() {
        format!("[!] {}: {}", n.title, n.description)
    } else {
        format!("[*] {}: {}", n.title, n.description)
    }
}

pub fn print_verdict(verdict: &Verdict) {
    println!();
    println!("{}", verdict.headline());
    println!("{}", verdict.summary());
}
