use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window limiter: at most `max_events` acquisitions in any `window`.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_events: usize,
    window: Duration,
    events: VecDeque<Instant>,
}

impl SlidingWindowLimiter {
    pub fn new(max_events: usize, window: Duration) -> Self {
        Self {
            max_events,
            window,
            events: VecDeque::with_capacity(max_events),
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.events.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.events.pop_front();
            } else {
                break;
            }
        }

        if self.events.len() >= self.max_events {
            return false;
        }

        self.events.push_back(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let mut limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.try_acquire_at(now));
        assert!(limiter.try_acquire_at(now));
        assert!(limiter.try_acquire_at(now));
        assert!(!limiter.try_acquire_at(now));
    }

    #[test]
    fn test_window_slides() {
        let mut limiter = SlidingWindowLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();
        assert!(limiter.try_acquire_at(start));
        assert!(limiter.try_acquire_at(start + Duration::from_secs(5)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(9)));
        // first event has aged out
        assert!(limiter.try_acquire_at(start + Duration::from_secs(10)));
        assert!(!limiter.try_acquire_at(start + Duration::from_secs(11)));
    }

    #[test]
    fn test_zero_limit_rejects_everything() {
        let mut limiter = SlidingWindowLimiter::new(0, Duration::from_secs(1));
        assert!(!limiter.try_acquire());
    }
}
