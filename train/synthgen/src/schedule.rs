use std::time::{Duration, Instant};

use tracing::debug;

/// Fixed-interval trigger for a single-threaded loop.
///
/// A tick that comes due while a cycle is still running fires right after it;
/// any further ticks missed during that cycle are dropped, never stacked up.
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// First tick fires one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    fn starting_at(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Blocks until the next tick.
    pub fn wait(&mut self) {
        let (sleep, dropped) = self.advance(Instant::now());
        if dropped > 0 {
            debug!(dropped, "cycle overran, ticks dropped");
        }
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }

    /// How long to sleep before the tick due at or after `now`, and how many
    /// ticks were skipped to get there.
    fn advance(&mut self, now: Instant) -> (Duration, u32) {
        if now <= self.next {
            let sleep = self.next - now;
            self.next += self.interval;
            return (sleep, 0);
        }

        let behind = now - self.next;
        let dropped = (behind.as_nanos() / self.interval.as_nanos()) as u32;
        self.next += self.interval * (dropped + 1);
        (Duration::ZERO, dropped)
    }
}
