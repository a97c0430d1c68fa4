use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_NOTIFICATION_LIFE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// A transient message for the notification surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// How long the message stays up before auto-dismissal
    pub life: Duration,
}

impl Notification {
    pub fn success(detail: &str, life: Duration) -> Self {
        Self {
            severity: Severity::Success,
            summary: "Successful".to_string(),
            detail: detail.to_string(),
            life,
        }
    }

    pub fn error(summary: &str, detail: &str, life: Duration) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.to_string(),
            detail: detail.to_string(),
            life,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.summary, self.detail)
    }
}

/// Pending notifications with their post time
#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: VecDeque<(Instant, Notification)>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, notification: Notification) {
        self.post_at(notification, Instant::now());
    }

    pub fn post_at(&mut self, notification: Notification, at: Instant) {
        self.pending.push_back((at, notification));
    }

    /// Notifications still visible at `now`; expired ones are dismissed
    pub fn active(&mut self, now: Instant) -> Vec<Notification> {
        self.pending
            .retain(|(posted, n)| now.saturating_duration_since(*posted) < n.life);
        self.pending.iter().map(|(_, n)| n.clone()).collect()
    }

    /// Hand every pending notification to the caller and clear the queue
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).map(|(_, n)| n).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_dismiss() {
        let mut center = NotificationCenter::new();
        let start = Instant::now();
        center.post_at(Notification::success("Application Created", DEFAULT_NOTIFICATION_LIFE), start);
        center.post_at(
            Notification::success("Application Deleted", Duration::from_millis(500)),
            start,
        );

        assert_eq!(center.active(start + Duration::from_millis(100)).len(), 2);
        let active = center.active(start + Duration::from_millis(1000));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].detail, "Application Created");
        assert!(center.active(start + Duration::from_millis(3000)).is_empty());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut center = NotificationCenter::new();
        center.post(Notification::success("Application Updated", DEFAULT_NOTIFICATION_LIFE));
        let drained = center.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].to_string(), "[success] Successful: Application Updated");
        assert!(center.is_empty());
    }

    #[test]
    fn test_error_display() {
        let n = Notification::error("Error", "No data to export", DEFAULT_NOTIFICATION_LIFE);
        assert_eq!(n.to_string(), "[error] Error: No data to export");
    }
}
