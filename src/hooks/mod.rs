//! Raw input hook seams
//!
//! The monitor consumes keyboard and mouse activity through these traits;
//! the default implementations in [`input`] capture system-wide events via
//! `rdev`. Tests substitute hooks that let them inject events directly.

mod input;

pub use input::{RdevKeyboardHook, RdevMouseHook};

use crate::event::MouseButton;

/// A raw keyboard event as delivered by the OS hook
#[derive(Debug, Clone)]
pub enum RawKeyboardEvent {
    /// A key went down; `text` is the character it produced, if any
    Press { key: rdev::Key, text: Option<String> },
    /// A key came up
    Release { key: rdev::Key, text: Option<String> },
}

/// A raw mouse event as delivered by the OS hook
///
/// Every variant carries pointer coordinates; hooks that only learn the
/// position from move events stamp the last known position onto clicks
/// and scrolls.
#[derive(Debug, Clone, Copy)]
pub enum RawMouseEvent {
    Click {
        x: f64,
        y: f64,
        button: MouseButton,
        pressed: bool,
    },
    Move {
        x: f64,
        y: f64,
    },
    Scroll {
        x: f64,
        y: f64,
        dx: i64,
        dy: i64,
    },
}

/// Handler invoked synchronously on the hook's delivery thread
pub type KeyboardHandler = Box<dyn Fn(RawKeyboardEvent) + Send + Sync + 'static>;
/// Handler invoked synchronously on the hook's delivery thread
pub type MouseHandler = Box<dyn Fn(RawMouseEvent) + Send + Sync + 'static>;

/// A source of global keyboard events with an explicit start/stop
pub trait KeyboardHook: Send {
    /// Begin delivering events to `handler`
    fn start(&mut self, handler: KeyboardHandler) -> anyhow::Result<()>;

    /// Stop delivery; stopping an inactive hook is a no-op
    fn stop(&mut self);
}

/// A source of global mouse events with an explicit start/stop
pub trait MouseHook: Send {
    /// Begin delivering events to `handler`
    fn start(&mut self, handler: MouseHandler) -> anyhow::Result<()>;

    /// Stop delivery; stopping an inactive hook is a no-op
    fn stop(&mut self);
}
