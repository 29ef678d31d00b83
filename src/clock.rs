use std::time::{Duration, Instant};

/// Monotonic time plus a bounded busy wait. The only blocking waits in the
/// game go through `delay`.
pub trait Clock {
    fn now(&self) -> Instant;

    fn delay(&mut self, duration: Duration);
}

/// real time; waits with spin_sleep for accurate short delays
pub struct SpinClock;

impl SpinClock {
    pub fn new() -> Self {
        SpinClock {}
    }
}

impl Default for SpinClock {
    fn default() -> Self {
        SpinClock::new()
    }
}

impl Clock for SpinClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn delay(&mut self, duration: Duration) {
        spin_sleep::sleep(duration);
    }
}

/// virtual time for tests: `delay` returns immediately but moves the clock
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Instant,
    delayed: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Instant::now(),
            delayed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// total time spent inside `delay`
    pub fn delayed(&self) -> Duration {
        self.delayed
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn delay(&mut self, duration: Duration) {
        self.now += duration;
        self.delayed += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_delay_moves_time() {
        let mut c = ManualClock::new();
        let t0 = c.now();
        c.delay(Duration::from_millis(250));
        c.advance(Duration::from_millis(50));
        assert_eq!(c.now() - t0, Duration::from_millis(300));
        assert_eq!(c.delayed(), Duration::from_millis(250));
    }

    #[test]
    fn test_spin_clock_delay_is_bounded() {
        let mut c = SpinClock::new();
        let t0 = c.now();
        c.delay(Duration::from_millis(5));
        assert!(c.now() - t0 >= Duration::from_millis(5));
    }
}
