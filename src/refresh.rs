//! Automatic refresh countdown and the manual refresh cooldown.

use std::time::{Duration, Instant};

use crate::timer::PeriodicTask;

pub const REFRESH_INTERVAL_SECS: u32 = 30;
pub const BUTTON_LOCK_SECS: u32 = 15;

const TICK: Duration = Duration::from_secs(1);

/// Both counters advance on their own one-second ticker. The countdown wraps
/// back to the full interval every time it reaches zero; the lock simply runs
/// out.
#[derive(Debug)]
pub struct RefreshController {
    interval: u32,
    lock_duration: u32,
    countdown: u32,
    lock_remaining: u32,
    countdown_task: PeriodicTask,
    lock_task: PeriodicTask,
}

impl RefreshController {
    pub fn new(interval: u32, lock_duration: u32) -> Self {
        let interval = interval.max(1);
        RefreshController {
            interval,
            lock_duration,
            countdown: interval,
            lock_remaining: 0,
            countdown_task: PeriodicTask::new(TICK),
            lock_task: PeriodicTask::new(TICK),
        }
    }

    /// Restart from a clean state; any previously running tickers are replaced.
    pub fn start(&mut self, now: Instant) {
        self.countdown = self.interval;
        self.lock_remaining = 0;
        self.lock_task.stop();
        self.countdown_task.start(now);
    }

    /// Advance both tickers to `now`. Returns how many automatic refreshes fell due.
    pub fn poll(&mut self, now: Instant) -> usize {
        for _ in 0..self.lock_task.poll(now) {
            self.tick_lock();
        }

        let mut due = 0;
        for _ in 0..self.countdown_task.poll(now) {
            if self.tick_countdown() {
                due += 1;
            }
        }
        due
    }

    /// One second of countdown. True when it expired and was reset.
    pub fn tick_countdown(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.countdown = self.interval;
            return true;
        }
        false
    }

    pub fn tick_lock(&mut self) {
        self.lock_remaining = self.lock_remaining.saturating_sub(1);
        if self.lock_remaining == 0 {
            self.lock_task.stop();
        }
    }

    /// Accept a manual refresh unless the button is locked. Accepting resets
    /// the countdown and engages the lock.
    pub fn request_manual(&mut self, now: Instant) -> bool {
        if self.is_locked() {
            return false;
        }

        self.countdown = self.interval;
        if self.lock_duration > 0 {
            self.lock_remaining = self.lock_duration;
            self.lock_task.start(now);
        }
        true
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn lock_remaining(&self) -> u32 {
        self.lock_remaining
    }

    pub fn is_locked(&self) -> bool {
        self.lock_remaining > 0
    }

    pub fn button_label(&self) -> String {
        if self.is_locked() {
            format!("Locked ({}s)", self.lock_remaining)
        } else {
            "Refresh".to_string()
        }
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        RefreshController::new(REFRESH_INTERVAL_SECS, BUTTON_LOCK_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_wraps_after_full_interval() {
        let mut ctl = RefreshController::default();
        let refreshes = (0..30).filter(|_| ctl.tick_countdown()).count();
        assert_eq!(refreshes, 1);
        assert_eq!(ctl.countdown(), 30);
    }

    #[test]
    fn countdown_never_goes_below_one_between_ticks() {
        let mut ctl = RefreshController::new(3, 15);
        let mut seen = Vec::new();
        for _ in 0..6 {
            ctl.tick_countdown();
            seen.push(ctl.countdown());
        }
        assert_eq!(seen, vec![2, 1, 3, 2, 1, 3]);
    }

    #[test]
    fn poll_drives_countdown_from_wall_clock() {
        let t0 = Instant::now();
        let mut ctl = RefreshController::default();
        ctl.start(t0);
        assert_eq!(ctl.poll(t0 + Duration::from_secs(29)), 0);
        assert_eq!(ctl.countdown(), 1);
        assert_eq!(ctl.poll(t0 + Duration::from_secs(30)), 1);
        assert_eq!(ctl.countdown(), 30);
        assert_eq!(ctl.poll(t0 + Duration::from_secs(90)), 2);
    }

    #[test]
    fn manual_refresh_engages_lock_and_resets_countdown() {
        let t0 = Instant::now();
        let mut ctl = RefreshController::default();
        ctl.start(t0);
        ctl.poll(t0 + Duration::from_secs(10));
        assert_eq!(ctl.countdown(), 20);

        let t1 = t0 + Duration::from_millis(10_500);
        assert!(ctl.request_manual(t1));
        assert_eq!(ctl.countdown(), 30);
        assert!(ctl.is_locked());
        assert_eq!(ctl.button_label(), "Locked (15s)");

        assert!(!ctl.request_manual(t1 + Duration::from_secs(1)));
    }

    #[test]
    fn rejected_request_changes_nothing() {
        let t0 = Instant::now();
        let mut ctl = RefreshController::default();
        ctl.start(t0);
        assert!(ctl.request_manual(t0));
        ctl.poll(t0 + Duration::from_secs(4));
        let (countdown, lock) = (ctl.countdown(), ctl.lock_remaining());
        assert!(!ctl.request_manual(t0 + Duration::from_secs(4)));
        assert_eq!(ctl.countdown(), countdown);
        assert_eq!(ctl.lock_remaining(), lock);
    }

    #[test]
    fn lock_counts_down_and_releases() {
        let t0 = Instant::now();
        let mut ctl = RefreshController::default();
        ctl.start(t0);
        ctl.request_manual(t0);
        ctl.poll(t0 + Duration::from_secs(5));
        assert_eq!(ctl.lock_remaining(), 10);
        assert_eq!(ctl.button_label(), "Locked (10s)");
        ctl.poll(t0 + Duration::from_secs(15));
        assert!(!ctl.is_locked());
        assert_eq!(ctl.button_label(), "Refresh");
        assert!(ctl.request_manual(t0 + Duration::from_secs(15)));
    }

    #[test]
    fn restart_clears_lock_and_countdown() {
        let t0 = Instant::now();
        let mut ctl = RefreshController::default();
        ctl.start(t0);
        ctl.request_manual(t0);
        ctl.poll(t0 + Duration::from_secs(3));
        ctl.start(t0 + Duration::from_secs(3));
        assert!(!ctl.is_locked());
        assert_eq!(ctl.countdown(), 30);
        assert_eq!(ctl.poll(t0 + Duration::from_secs(32)), 0);
        assert_eq!(ctl.countdown(), 1);
    }
}
