//! Wall-clock limits for long-running solves.

use std::time::{Duration, Instant};

use crate::error::{MeasureError, MeasureResult};

/// An optional point in time after which a computation must give up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    limit: Option<(Instant, Duration)>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self { limit: None }
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            limit: Some((Instant::now() + budget, budget)),
        }
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::none, Self::after)
    }

    pub fn is_expired(&self) -> bool {
        self.limit.is_some_and(|(at, _)| Instant::now() >= at)
    }

    /// Time left, or None when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|(at, _)| at.saturating_duration_since(Instant::now()))
    }

    pub fn budget(&self) -> Option<Duration> {
        self.limit.map(|(_, budget)| budget)
    }

    /// Fail with a timeout error naming `operation` once expired.
    pub fn check(&self, operation: &str) -> MeasureResult<()> {
        match self.limit {
            Some((at, budget)) if Instant::now() >= at => Err(MeasureError::timeout(operation, budget)),
            _ => Ok(()),
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_expires() {
        let deadline = Deadline::none();
        assert!(!deadline.is_expired());
        assert!(deadline.remaining().is_none());
        assert!(deadline.check("solve").is_ok());
    }

    #[test]
    fn test_zero_budget_expires_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        let err = deadline.check("I_R").unwrap_err();
        assert!(matches!(err, MeasureError::Timeout { ref operation, .. } if operation == "I_R"));
    }
}
