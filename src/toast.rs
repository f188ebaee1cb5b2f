//! Transient notifications.

use std::time::{Duration, Instant};

/// Default time a toast stays on screen.
pub const DEFAULT_TOAST_DELAY: Duration = Duration::from_secs(5);

/// Toast color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Danger,
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// Toast container. Toasts are kept in insertion order and removed once
/// dismissed, either explicitly or by expiring.
#[derive(Debug)]
pub struct Notifier {
    toasts: Vec<Toast>,
    next_id: u64,
    delay: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DELAY)
    }
}

impl Notifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            delay,
        }
    }

    /// Show a toast and return its id.
    pub fn show(&mut self, title: &str, body: &str, kind: ToastKind) -> u64 {
        self.show_at(title, body, kind, Instant::now())
    }

    pub fn show_at(&mut self, title: &str, body: &str, kind: ToastKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            title: title.to_string(),
            body: body.to_string(),
            kind,
            shown_at: now,
        });
        id
    }

    pub fn success(&mut self, body: &str) -> u64 {
        self.show("Success", body, ToastKind::Success)
    }

    pub fn danger(&mut self, body: &str) -> u64 {
        self.show("Error", body, ToastKind::Danger)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn dismiss_all(&mut self) {
        self.toasts.clear();
    }

    /// Drop every toast older than the delay. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let delay = self.delay;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < delay);
        before - self.toasts.len()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}
