//! Polled machine-state signals
//!
//! Source traits are the seams to the OS: each returns the current raw
//! reading or an error, and "no backend / no battery" is an unavailable
//! reading, not a failure. Platform defaults are selected at construction
//! time by [`Monitor::new`](crate::Monitor::new); tests inject fakes.

mod battery;
mod edge;
mod network;
mod volume;

pub use battery::default_battery_source;
pub use edge::EdgeDetector;
pub use network::default_network_source;
pub use volume::default_volume_source;

/// One battery sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    /// Charge level, 0–100
    pub percent: u8,
    /// Whether external power is connected
    pub plugged: bool,
}

/// One volume sample; either field may be unavailable independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeReading {
    /// Output level 0–100, if the backend could read it
    pub volume: Option<u8>,
    /// Output mute state, if the backend could read it
    pub muted: Option<bool>,
}

/// Reads the battery state; `Ok(None)` means no battery is present
pub trait BatterySource: Send + Sync {
    fn read(&self) -> anyhow::Result<Option<BatteryReading>>;
}

/// Reads per-interface link state, reduced to "any interface up"
pub trait NetworkSource: Send + Sync {
    fn any_interface_up(&self) -> anyhow::Result<bool>;
}

/// Reads output volume and mute state
///
/// `attach`/`detach` bracket the polling loop's lifetime for backends
/// that need per-thread environment setup; the defaults are no-ops.
pub trait VolumeSource: Send + Sync {
    fn read(&self) -> anyhow::Result<VolumeReading>;

    /// Called once before the first poll iteration
    fn attach(&self) {}

    /// Called once after the loop exits
    fn detach(&self) {}
}
