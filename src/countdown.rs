use std::time::{Duration, Instant};

/// what a call to `Countdown::tick` observed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownEvent {
    /// a new whole second was reached; carries the seconds left, rounded up
    Second(u32),
    /// time ran out; reported once per `start`
    Expired,
}

/// Restartable, non-blocking countdown driven by a monotonic clock.
///
/// Nothing here sleeps: the owner calls `tick` as often as it likes and
/// the countdown works out from `now` alone which boundary it is at, so
/// irregular polling neither double-fires nor skips the expiry.
#[derive(Clone, Debug, Default)]
pub struct Countdown {
    duration: Duration,
    started_at: Option<Instant>,
    last_reported: Option<u32>,
    expired: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Countdown::default()
    }

    /// (re)arm the countdown
    pub fn start(&mut self, duration: Duration, now: Instant) {
        self.duration = duration;
        self.started_at = Some(now);
        self.last_reported = None;
        self.expired = false;
    }

    /// disarm without firing
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.last_reported = None;
        self.expired = false;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && !self.expired
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// time left, zero once expired or when not armed
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) if !self.expired => self
                .duration
                .saturating_sub(now.saturating_duration_since(start)),
            _ => Duration::ZERO,
        }
    }

    /// Call every scheduler iteration. Returns `Second(n)` the first time a
    /// new (lower) whole second is observed, `Expired` exactly once when the
    /// duration has elapsed, and `None` otherwise. A slow poll that jumps
    /// several seconds reports only the current one.
    pub fn tick(&mut self, now: Instant) -> Option<CountdownEvent> {
        let start = self.started_at?;
        if self.expired {
            return None;
        }
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration {
            self.expired = true;
            return Some(CountdownEvent::Expired);
        }
        let secs = whole_seconds_up(self.duration - elapsed);
        match self.last_reported {
            Some(prev) if secs >= prev => None,
            _ => {
                self.last_reported = Some(secs);
                Some(CountdownEvent::Second(secs))
            }
        }
    }
}

fn whole_seconds_up(d: Duration) -> u32 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// tick at each offset and collect everything reported
    fn run(c: &mut Countdown, t0: Instant, offsets: &[u64]) -> Vec<CountdownEvent> {
        offsets.iter().filter_map(|o| c.tick(t0 + ms(*o))).collect()
    }

    #[test]
    fn test_idle_countdown_is_silent() {
        let mut c = Countdown::new();
        assert_eq!(c.tick(Instant::now()), None);
        assert!(!c.is_running());
        assert!(!c.is_expired());
    }

    #[test]
    fn test_reports_each_second_once() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(3), t0);
        let offsets: Vec<u64> = (0..=3_500).step_by(10).collect();
        assert_eq!(
            run(&mut c, t0, &offsets),
            vec![
                CountdownEvent::Second(3),
                CountdownEvent::Second(2),
                CountdownEvent::Second(1),
                CountdownEvent::Expired,
            ]
        );
    }

    #[test]
    fn test_slow_irregular_ticks_fire_once() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(20), t0);
        let events = run(&mut c, t0, &[0, 1_700, 1_800, 5_900, 12_000, 19_999, 20_000, 26_000, 40_000]);
        let expiries = events
            .iter()
            .filter(|e| **e == CountdownEvent::Expired)
            .count();
        assert_eq!(expiries, 1);
        assert_eq!(events.last(), Some(&CountdownEvent::Expired));
        let seconds: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                CountdownEvent::Second(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(seconds, vec![20, 19, 15, 8, 1]);
    }

    #[test]
    fn test_single_late_tick_expires_without_seconds() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(10), t0);
        assert_eq!(c.tick(t0 + ms(60_000)), Some(CountdownEvent::Expired));
        assert_eq!(c.tick(t0 + ms(60_001)), None);
        assert!(c.is_expired());
        assert_eq!(c.remaining(t0 + ms(60_001)), Duration::ZERO);
    }

    #[test]
    fn test_mixed_fast_and_slow_ticks() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(5), t0);
        let mut offsets = Vec::new();
        let mut t = 0;
        let mut step = 1;
        while t < 9_000 {
            offsets.push(t);
            t += step;
            step = if step > 1_500 { 3 } else { step * 3 };
        }
        let events = run(&mut c, t0, &offsets);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == CountdownEvent::Expired)
                .count(),
            1
        );
        let mut prev = u32::MAX;
        for e in events {
            if let CountdownEvent::Second(s) = e {
                assert!(s < prev);
                prev = s;
            }
        }
    }

    #[test]
    fn test_restart_rearms() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(1), t0);
        assert_eq!(c.tick(t0 + ms(1_000)), Some(CountdownEvent::Expired));
        c.start(Duration::from_secs(2), t0 + ms(1_000));
        assert!(c.is_running());
        assert_eq!(c.tick(t0 + ms(1_000)), Some(CountdownEvent::Second(2)));
        assert_eq!(c.tick(t0 + ms(3_000)), Some(CountdownEvent::Expired));
    }

    #[test]
    fn test_cancel_never_fires() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(Duration::from_secs(1), t0);
        c.cancel();
        assert_eq!(c.tick(t0 + ms(5_000)), None);
        assert!(!c.is_expired());
    }

    #[test]
    fn test_sub_second_duration() {
        let t0 = Instant::now();
        let mut c = Countdown::new();
        c.start(ms(1_500), t0);
        assert_eq!(c.tick(t0), Some(CountdownEvent::Second(2)));
        assert_eq!(c.tick(t0 + ms(600)), Some(CountdownEvent::Second(1)));
        assert_eq!(c.remaining(t0 + ms(600)), ms(900));
        assert_eq!(c.tick(t0 + ms(1_499)), None);
        assert_eq!(c.tick(t0 + ms(1_500)), Some(CountdownEvent::Expired));
    }
}
