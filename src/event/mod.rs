//! Event categories, registration triggers, and dispatched payloads
//!
//! The category set is closed: registration goes through the typed
//! [`Trigger`] enum, so an unknown category cannot be named at compile
//! time. [`EventCategory`] still parses from its snake_case string form
//! for embedders wiring listeners from configuration; that path is where
//! `Error::UnknownCategory` surfaces.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keys::KeyToken;

/// Default threshold for `volume_threshold` listeners that don't set one
pub const DEFAULT_VOLUME_THRESHOLD: u8 = 50;

/// The closed set of observable event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    KeyPress,
    KeyRelease,
    KeyCombo,
    MouseClick,
    MouseMove,
    MouseScroll,
    VolumeThreshold,
    VolumeMute,
    Battery,
    Network,
}

impl EventCategory {
    /// All categories, in declaration order
    pub const ALL: [EventCategory; 10] = [
        EventCategory::KeyPress,
        EventCategory::KeyRelease,
        EventCategory::KeyCombo,
        EventCategory::MouseClick,
        EventCategory::MouseMove,
        EventCategory::MouseScroll,
        EventCategory::VolumeThreshold,
        EventCategory::VolumeMute,
        EventCategory::Battery,
        EventCategory::Network,
    ];

    /// The snake_case name used in string form and serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::KeyPress => "key_press",
            EventCategory::KeyRelease => "key_release",
            EventCategory::KeyCombo => "key_combo",
            EventCategory::MouseClick => "mouse_click",
            EventCategory::MouseMove => "mouse_move",
            EventCategory::MouseScroll => "mouse_scroll",
            EventCategory::VolumeThreshold => "volume_threshold",
            EventCategory::VolumeMute => "volume_mute",
            EventCategory::Battery => "battery",
            EventCategory::Network => "network",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// A mouse button identity in click events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Any other button, by platform button number
    Other(u8),
}

/// What a listener subscribes to: a category plus its typed parameters
///
/// `KeyCombo` keys are given in raw string form and normalized into
/// [`KeyToken`]s at registration. An empty key list is accepted but inert:
/// it never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    KeyPress,
    KeyRelease,
    /// Fire when every named key is held at the instant of any press
    KeyCombo { keys: Vec<String> },
    MouseClick,
    MouseMove,
    MouseScroll,
    /// Fire when the volume crosses `threshold` in either direction
    VolumeThreshold { threshold: u8 },
    VolumeMute,
    Battery,
    Network,
}

impl Trigger {
    /// A volume-threshold trigger at [`DEFAULT_VOLUME_THRESHOLD`]
    pub fn volume_threshold() -> Self {
        Trigger::VolumeThreshold {
            threshold: DEFAULT_VOLUME_THRESHOLD,
        }
    }

    /// The category this trigger subscribes to
    pub fn category(&self) -> EventCategory {
        match self {
            Trigger::KeyPress => EventCategory::KeyPress,
            Trigger::KeyRelease => EventCategory::KeyRelease,
            Trigger::KeyCombo { .. } => EventCategory::KeyCombo,
            Trigger::MouseClick => EventCategory::MouseClick,
            Trigger::MouseMove => EventCategory::MouseMove,
            Trigger::MouseScroll => EventCategory::MouseScroll,
            Trigger::VolumeThreshold { .. } => EventCategory::VolumeThreshold,
            Trigger::VolumeMute => EventCategory::VolumeMute,
            Trigger::Battery => EventCategory::Battery,
            Trigger::Network => EventCategory::Network,
        }
    }
}

/// The payload delivered to a listener callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A key went down
    KeyPress { key: KeyToken },

    /// A key came up
    KeyRelease { key: KeyToken },

    /// A registered key combination is fully held
    KeyCombo { keys: Vec<KeyToken> },

    /// A mouse button changed state at (x, y)
    MouseClick {
        x: f64,
        y: f64,
        button: MouseButton,
        pressed: bool,
    },

    /// The pointer moved to (x, y)
    MouseMove { x: f64, y: f64 },

    /// The wheel scrolled by (dx, dy) with the pointer at (x, y)
    MouseScroll { x: f64, y: f64, dx: i64, dy: i64 },

    /// The volume crossed the configured threshold; carries the actual level
    VolumeThreshold { volume: u8 },

    /// The output mute state changed
    VolumeMute { muted: bool },

    /// Battery percentage or plug state changed
    Battery { percent: u8, plugged: bool },

    /// Overall connectivity (any interface up) changed
    Network { connected: bool },
}

impl Event {
    /// The category this event dispatches under
    pub fn category(&self) -> EventCategory {
        match self {
            Event::KeyPress { .. } => EventCategory::KeyPress,
            Event::KeyRelease { .. } => EventCategory::KeyRelease,
            Event::KeyCombo { .. } => EventCategory::KeyCombo,
            Event::MouseClick { .. } => EventCategory::MouseClick,
            Event::MouseMove { .. } => EventCategory::MouseMove,
            Event::MouseScroll { .. } => EventCategory::MouseScroll,
            Event::VolumeThreshold { .. } => EventCategory::VolumeThreshold,
            Event::VolumeMute { .. } => EventCategory::VolumeMute,
            Event::Battery { .. } => EventCategory::Battery,
            Event::Network { .. } => EventCategory::Network,
        }
    }
}
