use std::time::Duration;

/// Ring buffer of recent tick intervals.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.history.len()
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Record an interval given in milliseconds. Negative or non-finite
    /// values count as zero.
    pub fn record_ms(&mut self, ms: f64) {
        let dt = if ms.is_finite() && ms > 0.0 {
            Duration::from_secs_f64(ms / 1000.0)
        } else {
            Duration::ZERO
        };
        self.record(dt);
    }

    fn samples(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let samples = self.samples();
        if samples.is_empty() {
            return Duration::ZERO;
        }
        samples.iter().sum::<Duration>() / samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.samples().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.history.len()
        } else {
            self.index
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_shows_in_max_and_average() {
        let mut timer = FrameTimer::new(4);
        for _ in 0..3 {
            timer.record_ms(16.0);
        }
        timer.record_ms(200.0);

        assert_eq!(timer.count(), 4);
        assert_eq!(timer.min(), Duration::from_millis(16));
        assert_eq!(timer.max(), Duration::from_millis(200));
        assert_eq!(timer.average(), Duration::from_millis(62));
    }

    #[test]
    fn stall_ages_out_after_capacity_ticks() {
        let mut timer = FrameTimer::new(4);
        timer.record_ms(200.0);
        for _ in 0..3 {
            timer.record_ms(16.0);
        }
        assert_eq!(timer.max(), Duration::from_millis(200));

        timer.record_ms(16.0);
        assert_eq!(timer.count(), 4);
        assert_eq!(timer.max(), Duration::from_millis(16));
        assert_eq!(timer.average(), Duration::from_millis(16));
    }

    #[test]
    fn bad_millisecond_values_record_zero() {
        let mut timer = FrameTimer::new(4);
        timer.record_ms(-5.0);
        timer.record_ms(f64::NAN);
        timer.record_ms(16.0);
        assert_eq!(timer.count(), 3);
        assert_eq!(timer.min(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::from_millis(16));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.capacity(), 1);
        assert_eq!(timer.average(), Duration::ZERO);
    }
}
