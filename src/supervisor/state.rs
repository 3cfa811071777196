//! Supervisor bookkeeping: consecutive-error counting and health-check
//! rate limiting

use std::time::Instant;

/// Tracks consecutive failures and decides when a full restart is due
#[derive(Debug)]
pub struct SupervisorState {
    error_count: u32,
    max_errors: u32,
    last_health_check: Option<Instant>,
}

impl SupervisorState {
    pub fn new(max_errors: u32) -> Self {
        Self {
            error_count: 0,
            max_errors,
            last_health_check: None,
        }
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Record one failure. Returns true when the threshold is reached and
    /// a restart must happen.
    pub fn record_error(&mut self) -> bool {
        self.error_count += 1;
        self.error_count >= self.max_errors
    }

    /// Clear the error counter after a restart or heal
    pub fn reset(&mut self) {
        self.error_count = 0;
    }

    /// Whether enough time has passed since the last health check.
    /// Calling this marks a check as performed at `now`.
    pub fn health_check_due(&mut self, interval: std::time::Duration, now: Instant) -> bool {
        match self.last_health_check {
            Some(last) if now.duration_since(last) < interval => false,
            _ => {
                self.last_health_check = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_restart_triggers_exactly_at_threshold() {
        let mut state = SupervisorState::new(5);

        let mut restarts = 0;
        for _ in 0..5 {
            if state.record_error() {
                restarts += 1;
                state.reset();
            }
        }

        assert_eq!(restarts, 1);
        assert_eq!(state.error_count(), 0);
    }

    #[test]
    fn test_errors_below_threshold_do_not_restart() {
        let mut state = SupervisorState::new(5);
        for _ in 0..4 {
            assert!(!state.record_error());
        }
        assert_eq!(state.error_count(), 4);
    }

    #[test]
    fn test_health_check_rate_limited() {
        let mut state = SupervisorState::new(5);
        let interval = Duration::from_secs(60);
        let start = Instant::now();

        assert!(state.health_check_due(interval, start));
        assert!(!state.health_check_due(interval, start + Duration::from_secs(30)));
        assert!(state.health_check_due(interval, start + Duration::from_secs(61)));
    }

    #[test]
    fn test_first_health_check_always_due() {
        let mut state = SupervisorState::new(5);
        assert!(state.health_check_due(Duration::from_secs(60), Instant::now()));
    }
}
