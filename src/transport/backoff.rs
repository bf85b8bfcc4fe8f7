use std::time::Duration;

/// Doubling delay schedule, capped at `max_delay`
///
/// The attempt bound lives in the caller's retry loop; this only computes
/// how long to wait before the next try.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    current_attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            current_attempt: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let factor = 2_u32.saturating_pow(self.current_attempt);
        let delay = std::cmp::min(self.initial_delay.saturating_mul(factor), self.max_delay);
        self.current_attempt = self.current_attempt.saturating_add(1);
        delay
    }

    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }
}
