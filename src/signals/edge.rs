//! Edge detection over repeatedly-sampled values
//!
//! Turns a stream of noisy samples into discrete transitions: a value is
//! forwarded only when its classified form differs from the last one
//! forwarded. `None` is the initial "unknown" sentinel, so the first real
//! sample always counts as a change.

/// Remembers the last classified value and reports changes exactly once
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector<T: PartialEq + Clone> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> EdgeDetector<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Compare against the stored value; on change, store and return the
    /// new value for dispatch. Unchanged samples return `None`.
    pub fn evaluate(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }

    /// The last value forwarded, if any sample has been seen
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}
