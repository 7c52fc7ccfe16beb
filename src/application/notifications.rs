use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::spawn_local;
use leptos::SignalUpdate;

use crate::domain::logging::{LogComponent, get_logger};
use crate::global_state::{next_notification_id, notifications};

/// Toasts auto-dismiss after five seconds.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient toast. Success receipts carry a label/value grid; errors a
/// single body line.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub details: Vec<(String, String)>,
}

impl Notification {
    pub fn success(title: &str, details: Vec<(String, String)>) -> Self {
        Self {
            id: 0,
            kind: NotificationKind::Success,
            title: title.to_string(),
            body: String::new(),
            details,
        }
    }

    pub fn error(title: &str, body: String) -> Self {
        Self {
            id: 0,
            kind: NotificationKind::Error,
            title: title.to_string(),
            body,
            details: Vec::new(),
        }
    }

    /// One-line-per-field rendering, used for the console log mirror.
    pub fn to_plain_text(&self) -> String {
        let mut text = self.title.clone();
        if !self.body.is_empty() {
            text.push_str(": ");
            text.push_str(&self.body);
        }
        for (label, value) in &self.details {
            text.push('\n');
            text.push_str(label);
            text.push_str(": ");
            text.push_str(value);
        }
        text
    }
}

/// Append to the toast stack. Returns the assigned id for dismissal.
pub fn push(mut notification: Notification) -> u64 {
    let id = next_notification_id();
    notification.id = id;
    get_logger().debug(
        LogComponent::Application("Notifications"),
        &notification.to_plain_text(),
    );
    notifications().update(|stack| stack.push(notification));
    id
}

pub fn dismiss(id: u64) {
    notifications().update(|stack| stack.retain(|n| n.id != id));
}

/// Auto-dismiss after [`NOTIFICATION_TTL`]. Browser only - callers off the
/// main UI path dismiss explicitly instead.
pub fn schedule_expiry(id: u64) {
    spawn_local(async move {
        sleep(NOTIFICATION_TTL).await;
        dismiss(id);
    });
}
