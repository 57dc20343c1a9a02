//! Notification entries shown in the GUI's activity strip.

use std::collections::VecDeque;

/// Severity of a notification, used only for coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A notification entry with message and timestamp
#[derive(Clone)]
pub struct NotificationEntry {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: chrono::Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

/// Push a notification, keeping only the most recent entries.
pub fn push_notification(
    notifications: &mut VecDeque<NotificationEntry>,
    entry: NotificationEntry,
) {
    const MAX_NOTIFICATIONS: usize = 20;
    notifications.push_back(entry);
    while notifications.len() > MAX_NOTIFICATIONS {
        notifications.pop_front();
    }
}
