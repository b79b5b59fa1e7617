use std::time::Duration;

/// Converts variable frame deltas into a whole number of fixed-period simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    period: Duration,
    ticker: Duration,
    total_ticks: u64,
}

impl GameClock {
    /// A zero period is bumped to one nanosecond so `advance` always terminates.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_nanos(1)),
            ticker: Duration::ZERO,
            total_ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time accumulated towards the next tick.
    pub fn residual(&self) -> Duration {
        self.ticker
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Accumulates `dt` and returns how many ticks are now due.
    ///
    /// A long frame yields several ticks at once; nothing is skipped.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.ticker = self.ticker.saturating_add(dt);

        let mut ticks = 0u32;
        while self.ticker >= self.period {
            self.ticker -= self.period;
            ticks = ticks.saturating_add(1);
        }
        self.total_ticks = self.total_ticks.saturating_add(u64::from(ticks));
        ticks
    }

    pub fn reset(&mut self) {
        self.ticker = Duration::ZERO;
        self.total_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_frames_accumulate_until_a_tick_is_due() {
        let mut clock = GameClock::new(Duration::from_millis(200));
        assert_eq!(clock.advance(Duration::from_millis(120)), 0);
        assert_eq!(clock.advance(Duration::from_millis(120)), 1);
        assert_eq!(clock.residual(), Duration::from_millis(40));
    }

    #[test]
    fn exact_period_produces_one_tick_and_no_residual() {
        let mut clock = GameClock::new(Duration::from_millis(200));
        assert_eq!(clock.advance(Duration::from_millis(200)), 1);
        assert_eq!(clock.residual(), Duration::ZERO);
    }

    #[test]
    fn zero_period_still_terminates() {
        let mut clock = GameClock::new(Duration::ZERO);
        assert_eq!(clock.advance(Duration::from_nanos(3)), 3);
    }
}
