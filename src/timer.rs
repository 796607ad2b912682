use std::time::{Duration, Instant};

/// A repeating schedule polled from the event loop.
///
/// Starting an already running task replaces its schedule, so two
/// overlapping instances of the same timer can never exist.
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    period: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTask {
    pub fn new(period: Duration) -> Self {
        PeriodicTask { period, next_due: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.stop();
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Number of whole periods that elapsed since the previous poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn stopped_task_never_fires() {
        let mut task = PeriodicTask::new(SEC);
        assert_eq!(task.poll(Instant::now() + 10 * SEC), 0);
    }

    #[test]
    fn counts_elapsed_periods() {
        let t0 = Instant::now();
        let mut task = PeriodicTask::new(SEC);
        task.start(t0);
        assert_eq!(task.poll(t0 + Duration::from_millis(999)), 0);
        assert_eq!(task.poll(t0 + SEC), 1);
        assert_eq!(task.poll(t0 + Duration::from_millis(3500)), 2);
        assert_eq!(task.poll(t0 + 4 * SEC), 1);
    }

    #[test]
    fn restart_replaces_previous_schedule() {
        let t0 = Instant::now();
        let mut task = PeriodicTask::new(SEC);
        task.start(t0);
        task.start(t0 + Duration::from_millis(900));
        assert_eq!(task.poll(t0 + SEC), 0);
        assert_eq!(task.poll(t0 + Duration::from_millis(1900)), 1);
    }

    #[test]
    fn stop_cancels_pending_periods() {
        let t0 = Instant::now();
        let mut task = PeriodicTask::new(SEC);
        task.start(t0);
        task.stop();
        assert_eq!(task.poll(t0 + 5 * SEC), 0);
    }
}
