use std::time::{Duration, Instant};

use tracing::trace;

/// A transient message with an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub posted_at: Instant,
    pub duration: Duration,
}

impl Notification {
    fn expired(&self, now: Instant) -> bool { now >= self.posted_at + self.duration }
}

/// Single visible slot: a new notification immediately replaces the current
/// one. Each post bumps a generation counter; an expiry only hides the slot
/// when its generation is still current, so a stale timer firing after a
/// newer post is ignored.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    visible: Option<(u64, Notification)>,
    next_generation: u64,
}

impl NotificationQueue {
    pub fn new() -> Self { Self::default() }

    /// Posts a message and returns the generation to arm its expiry timer
    /// with.
    pub fn post(&mut self, message: impl Into<String>, duration: Duration, now: Instant) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        let notification = Notification {
            message: message.into(),
            posted_at: now,
            duration,
        };
        trace!(generation, message = %notification.message, "posted notification");
        self.visible = Some((generation, notification));
        generation
    }

    /// Handles a fired expiry timer. Returns true when the visible slot was
    /// actually cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.visible {
            Some((current, _)) if *current == generation => {
                self.visible = None;
                true
            }
            _ => false,
        }
    }

    /// The currently visible notification, if any. Also treats a past-expiry
    /// notification as gone so snapshots never show a dead message.
    pub fn visible(&self, now: Instant) -> Option<&Notification> {
        match &self.visible {
            Some((_, notification)) if !notification.expired(now) => Some(notification),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const THREE_SECS: Duration = Duration::from_secs(3);

    #[test]
    fn posting_replaces_the_visible_notification() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.post("first", THREE_SECS, now);
        queue.post("second", THREE_SECS, now + Duration::from_secs(1));
        assert_eq!(
            queue.visible(now + Duration::from_secs(1)).unwrap().message,
            "second"
        );
    }

    #[test]
    fn stale_expiry_never_hides_a_newer_notification() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        let first = queue.post("first", THREE_SECS, now);
        queue.post("second", THREE_SECS, now + Duration::from_secs(1));

        assert!(!queue.expire(first));
        assert_eq!(
            queue.visible(now + Duration::from_secs(2)).unwrap().message,
            "second"
        );
    }

    #[test]
    fn current_expiry_clears_the_slot() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        let generation = queue.post("only", THREE_SECS, now);
        assert!(queue.expire(generation));
        assert_eq!(queue.visible(now), None);
    }

    #[test]
    fn visible_hides_past_expiry_even_without_the_timer() {
        let now = Instant::now();
        let mut queue = NotificationQueue::new();
        queue.post("short", THREE_SECS, now);
        assert!(queue.visible(now + Duration::from_secs(2)).is_some());
        assert_eq!(queue.visible(now + THREE_SECS), None);
    }
}
