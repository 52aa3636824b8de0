//! Tick-based exponential backoff for hover re-checks.
//!
//! Doubling interval capped at a maximum. There is no jitter: the
//! simulation must stay deterministic for a fixed configuration.

#[derive(Debug, Clone)]
pub struct Backoff {
    base: u32,
    max: u32,
    current: u32,
}

impl Backoff {
    pub fn new(base: u32, max: u32) -> Self {
        let base = base.max(1);
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    /// Interval to wait before the next attempt.
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }

    /// Record a failed attempt and return the next interval.
    pub fn fail(&mut self) -> u32 {
        self.current = self.current.saturating_mul(2).min(self.max);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_backoff_starts_at_base() {
        let backoff = Backoff::new(60, 240);
        assert_eq!(backoff.current(), 60);
    }

    #[test]
    fn fail_doubles_until_reset() {
        let mut backoff = Backoff::new(10, 1000);
        assert_eq!(backoff.fail(), 20);
        assert_eq!(backoff.fail(), 40);

        backoff.reset();
        assert_eq!(backoff.current(), 10);
    }

    #[test]
    fn fail_saturates_at_max() {
        let mut backoff = Backoff::new(10, 20);
        assert_eq!(backoff.fail(), 20);
        assert_eq!(backoff.fail(), 20);
    }

    #[test]
    fn zero_base_is_clamped() {
        let mut backoff = Backoff::new(0, 0);
        assert_eq!(backoff.current(), 1);
        assert_eq!(backoff.fail(), 1);
    }
}
