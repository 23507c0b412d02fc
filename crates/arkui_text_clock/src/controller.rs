//! Imperative start/stop handle

use std::sync::Weak;

use crate::text_clock::ClockInner;

/// Starts and stops a [`TextClock`](crate::TextClock) from application code
///
/// Holds the component weakly; calls after the component is gone do nothing.
#[derive(Clone)]
pub struct TextClockController {
    inner: Weak<ClockInner>,
}

impl TextClockController {
    pub(crate) fn new(inner: Weak<ClockInner>) -> Self {
        Self { inner }
    }

    pub fn start(&self) {
        match self.inner.upgrade() {
            Some(inner) => inner.start(),
            None => tracing::debug!("start on a released text clock"),
        }
    }

    pub fn stop(&self) {
        match self.inner.upgrade() {
            Some(inner) => inner.stop(),
            None => tracing::debug!("stop on a released text clock"),
        }
    }

    /// Whether the component is still alive
    pub fn is_bound(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
