//! Pressed-key set and combo matching
//!
//! One mutex guards the set across press, release, and snapshot; combo
//! checks run against a snapshot so dispatch never holds the lock.

use std::collections::HashSet;
use std::sync::Mutex;

use super::KeyToken;

/// The set of keys currently held down, shared between hook threads
#[derive(Debug, Default)]
pub struct KeyStateTracker {
    pressed: Mutex<HashSet<KeyToken>>,
}

impl KeyStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key as held
    pub fn press(&self, token: KeyToken) {
        self.pressed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token);
    }

    /// Record a key as released; releasing an untracked key is a no-op
    pub fn release(&self, token: &KeyToken) {
        self.pressed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
    }

    /// A copy of the currently-held keys for lock-free downstream use
    pub fn snapshot(&self) -> HashSet<KeyToken> {
        self.pressed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// True iff every combo key is in the snapshot; an empty combo never matches
pub fn combo_matches(combo: &[KeyToken], snapshot: &HashSet<KeyToken>) -> bool {
    !combo.is_empty() && combo.iter().all(|k| snapshot.contains(k))
}
