//! Listener registry and dispatch
//!
//! Subscriptions are appended per category and dispatched in registration
//! order. A callback that panics is reported and isolated; the remaining
//! callbacks in the same dispatch still run. Combo subscriptions keep
//! their key lists normalized so every press can be tested against a
//! snapshot of the pressed-key set.

use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::RwLock;

use tracing::{error, trace};

use crate::event::{Event, EventCategory, Trigger};
use crate::keys::{combo_matches, KeyToken};

/// A listener callback, invoked synchronously on the delivering actor
pub type Callback = Box<dyn Fn(&Event) + Send + Sync + 'static>;

/// One registered listener: its trigger parameters and callback
struct Subscription {
    trigger: Trigger,
    /// Normalized combo keys; empty unless the trigger is `KeyCombo`
    combo: Vec<KeyToken>,
    callback: Callback,
}

/// Per-category ordered subscription lists
///
/// Registration takes the write lock; dispatch reads. Subscriptions are
/// immutable once stored and live until the registry is dropped (there is
/// no unsubscribe).
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<HashMap<EventCategory, Vec<Subscription>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscription to its category's list
    ///
    /// No de-duplication: registering the same callback twice makes it
    /// fire twice. An empty `KeyCombo` key list is accepted but inert.
    pub fn register(&self, trigger: Trigger, callback: Callback) {
        let combo = match &trigger {
            Trigger::KeyCombo { keys } => keys.iter().map(|k| KeyToken::new(k.clone())).collect(),
            _ => Vec::new(),
        };
        let category = trigger.category();
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(category)
            .or_default()
            .push(Subscription {
                trigger,
                combo,
                callback,
            });
        trace!(%category, "listener registered");
    }

    /// True if at least one subscription exists for the category
    pub fn has_listeners(&self, category: EventCategory) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&category)
            .is_some_and(|subs| !subs.is_empty())
    }

    /// Invoke every callback registered for the event's category, in order
    pub fn dispatch(&self, event: &Event) {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        let Some(subs) = listeners.get(&event.category()) else {
            return;
        };
        for sub in subs {
            invoke(&sub.callback, event);
        }
    }

    /// Test every combo subscription against the snapshot and dispatch
    /// `KeyCombo` to each whose keys are all held
    pub fn dispatch_combos(&self, snapshot: &HashSet<KeyToken>) {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        let Some(subs) = listeners.get(&EventCategory::KeyCombo) else {
            return;
        };
        for sub in subs {
            if combo_matches(&sub.combo, snapshot) {
                let event = Event::KeyCombo {
                    keys: sub.combo.clone(),
                };
                invoke(&sub.callback, &event);
            }
        }
    }

    /// Threshold of the first-registered volume-threshold listener
    ///
    /// Only this one value classifies the volume signal, even when later
    /// listeners registered different thresholds.
    pub fn first_volume_threshold(&self) -> Option<u8> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&EventCategory::VolumeThreshold)?
            .iter()
            .find_map(|sub| match sub.trigger {
                Trigger::VolumeThreshold { threshold } => Some(threshold),
                _ => None,
            })
    }
}

/// Run one callback, isolating a panic to this invocation
fn invoke(callback: &Callback, event: &Event) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic".to_string());
        error!(category = %event.category(), %reason, "listener callback panicked");
    }
}
