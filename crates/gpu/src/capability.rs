//! Availability tracking for the id-pass picking path.
//!
//! Readback can stop working mid-session (context loss, resource pressure).
//! After a few consecutive failures the path reports unavailable so callers
//! fall through to CPU picking; a later recheck lets it come back.

const FAILURE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPassCapability {
    available: bool,
    consecutive_failures: u32,
}

impl Default for IdPassCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl IdPassCapability {
    pub fn new() -> Self {
        Self {
            available: true,
            consecutive_failures: 0,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            consecutive_failures: FAILURE_THRESHOLD,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.available = true;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= FAILURE_THRESHOLD {
            self.available = false;
        }
    }

    /// Give the path another chance after it was marked unavailable.
    pub fn recheck(&mut self) {
        self.available = true;
        self.consecutive_failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::IdPassCapability;

    #[test]
    fn stays_available_through_isolated_failures() {
        let mut cap = IdPassCapability::new();
        cap.record_failure();
        cap.record_success();
        cap.record_failure();
        cap.record_failure();
        assert!(cap.is_available());
    }

    #[test]
    fn repeated_failures_disable_the_path() {
        let mut cap = IdPassCapability::new();
        for _ in 0..3 {
            cap.record_failure();
        }
        assert!(!cap.is_available());
        cap.recheck();
        assert!(cap.is_available());
    }
}
