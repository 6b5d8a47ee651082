//! keynet: cross-platform host event monitoring
//!
//! Observes keyboard and mouse activity plus slowly-changing machine
//! state (battery, network link, audio volume/mute) and dispatches
//! registered callbacks on state transitions. Keyboard and mouse events
//! arrive through global input hooks; polled signals are sampled once per
//! interval and edge-detected, so a listener hears about each transition
//! exactly once rather than on every sample.
//!
//! This is an embeddable library surface: no GUI, persistence, or wire
//! protocol. Callbacks run synchronously on the delivering thread, so
//! keep them fast.
//!
//! ```no_run
//! use keynet::{Monitor, Trigger};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut monitor = Monitor::new();
//!     monitor.register(
//!         Trigger::KeyCombo { keys: vec!["ctrl".into(), "c".into()] },
//!         |event| println!("combo held: {event:?}"),
//!     );
//!     monitor.register(Trigger::Battery, |event| println!("{event:?}"));
//!
//!     monitor.start()?;
//!     tokio::signal::ctrl_c().await?;
//!     monitor.stop().await;
//!     Ok(())
//! }
//! ```

mod error;
mod event;
mod hooks;
mod keys;
mod monitor;
mod registry;
mod signals;

pub use error::{Error, Result};
pub use event::{Event, EventCategory, MouseButton, Trigger, DEFAULT_VOLUME_THRESHOLD};
pub use hooks::{
    KeyboardHandler, KeyboardHook, MouseHandler, MouseHook, RawKeyboardEvent, RawMouseEvent,
    RdevKeyboardHook, RdevMouseHook,
};
pub use keys::{normalize, KeyToken};
pub use monitor::{Monitor, DEFAULT_POLL_INTERVAL};
pub use signals::{
    BatteryReading, BatterySource, EdgeDetector, NetworkSource, VolumeReading, VolumeSource,
};
