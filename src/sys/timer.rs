use std::time::{Duration, Instant};

/// Work the event loop owes the reactor at some future instant.
///
/// Recurring ticks are re-armed by their handler when they fire; notification
/// expiries are one-shot and carry the generation they were armed for so a
/// stale expiry can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    ClockTick,
    ConnectivityPoll,
    NotificationExpiry(u64),
}

/// Explicit scheduled-task queue. The queue never holds more than a handful
/// of entries (two recurring ticks plus pending expiries), so a sorted-on-pop
/// `Vec` is all the structure needed.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<(Instant, TimerTask)>,
}

impl TimerQueue {
    pub fn new() -> Self { Self::default() }

    pub fn schedule(&mut self, deadline: Instant, task: TimerTask) {
        self.entries.push((deadline, task));
    }

    pub fn schedule_in(&mut self, now: Instant, delay: Duration, task: TimerTask) {
        self.schedule(now + delay, task);
    }

    /// Earliest pending deadline, for `recv_timeout`-style waits.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(deadline, _)| *deadline).min()
    }

    /// Removes and returns every task due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<TimerTask> {
        let mut due: Vec<(Instant, TimerTask)> = Vec::new();
        self.entries.retain(|&(deadline, task)| {
            if deadline <= now {
                due.push((deadline, task));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(deadline, _)| deadline);
        due.into_iter().map(|(_, task)| task).collect()
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn len(&self) -> usize { self.entries.len() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pops_due_tasks_in_deadline_order() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(now + Duration::from_secs(5), TimerTask::ConnectivityPoll);
        queue.schedule(now + Duration::from_secs(1), TimerTask::ClockTick);
        queue.schedule(now + Duration::from_secs(3), TimerTask::NotificationExpiry(1));

        assert_eq!(queue.next_deadline(), Some(now + Duration::from_secs(1)));
        assert_eq!(queue.pop_due(now), vec![]);

        let due = queue.pop_due(now + Duration::from_secs(3));
        assert_eq!(due, vec![
            TimerTask::ClockTick,
            TimerTask::NotificationExpiry(1)
        ]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn one_shots_do_not_rearm() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule_in(now, Duration::from_secs(3), TimerTask::NotificationExpiry(7));
        queue.pop_due(now + Duration::from_secs(3));
        assert!(queue.is_empty());
    }
}
