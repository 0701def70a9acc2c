//! Progress indication around a dispatch attempt

use std::sync::Arc;

/// Something the calling environment shows while a request is in flight
///
/// Implementations render a spinner, overlay or status line. The dispatcher
/// only ever calls `begin` and `end`, once each per attempt.
pub trait ProgressIndicator: Send + Sync {
    /// Show the indicator
    fn begin(&self);

    /// Hide the indicator
    fn end(&self);
}

/// Ends the indicator when dropped
///
/// Held for the lifetime of one attempt, so `end` runs on every exit path,
/// including errors, panics and a dropped future.
#[must_use = "dropping the guard ends the indicator immediately"]
pub struct ProgressGuard {
    indicator: Option<Arc<dyn ProgressIndicator>>,
}

impl ProgressGuard {
    /// Begin `indicator` if present
    pub fn begin(indicator: Option<Arc<dyn ProgressIndicator>>) -> Self {
        if let Some(indicator) = &indicator {
            indicator.begin();
        }
        Self { indicator }
    }

    /// A guard that shows nothing
    pub fn none() -> Self {
        Self { indicator: None }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.indicator.is_some()
    }
}

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if let Some(indicator) = self.indicator.take() {
            indicator.end();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingIndicator;
    use super::*;

    #[test]
    fn test_guard_begins_and_ends() {
        let indicator = Arc::new(CountingIndicator::default());
        {
            let guard = ProgressGuard::begin(Some(indicator.clone()));
            assert!(guard.is_active());
            assert!(indicator.visible());
        }
        assert_eq!(indicator.begun(), 1);
        assert_eq!(indicator.ended(), 1);
    }

    #[test]
    fn test_guard_ends_on_panic() {
        let indicator = Arc::new(CountingIndicator::default());
        let shared = indicator.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = ProgressGuard::begin(Some(shared));
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(!indicator.visible());
    }

    #[test]
    fn test_none_guard_is_inert() {
        let guard = ProgressGuard::none();
        assert!(!guard.is_active());
    }
}
