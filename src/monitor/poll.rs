//! Background polling of battery, network, and volume signals
//!
//! One task samples every polled signal once per interval and feeds each
//! sample through its edge detector, so listeners hear about transitions
//! exactly once. Signals with no listeners are not sampled at all. A
//! failing query is logged and skipped for that cycle; it never stops the
//! loop or touches stored state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::event::{Event, EventCategory, DEFAULT_VOLUME_THRESHOLD};
use crate::registry::ListenerRegistry;
use crate::signals::{BatterySource, EdgeDetector, NetworkSource, VolumeSource};

/// Last classified value per polled signal
///
/// Owned by the `Monitor` and retained across restarts: stopping and
/// starting resets no memory, so a restart only fires on a genuine
/// transition since the last observed value.
#[derive(Default)]
pub(crate) struct SignalStates {
    pub battery: EdgeDetector<(u8, bool)>,
    pub network: EdgeDetector<bool>,
    pub volume_above: EdgeDetector<bool>,
    pub mute: EdgeDetector<bool>,
}

/// The polling task's world: registry, sources, and shared signal state
pub(crate) struct Poller {
    pub registry: Arc<ListenerRegistry>,
    pub states: Arc<Mutex<SignalStates>>,
    pub battery: Arc<dyn BatterySource>,
    pub network: Arc<dyn NetworkSource>,
    pub volume: Arc<dyn VolumeSource>,
}

/// Detaches the volume backend when the loop exits, however it exits
struct VolumeSession(Arc<dyn VolumeSource>);

impl VolumeSession {
    fn begin(source: Arc<dyn VolumeSource>) -> Self {
        source.attach();
        VolumeSession(source)
    }
}

impl Drop for VolumeSession {
    fn drop(&mut self) {
        self.0.detach();
    }
}

impl Poller {
    /// Run until the stop flag flips; the flag is observed at the top of
    /// each iteration, so shutdown is bounded by one poll interval.
    pub async fn run(self, interval: Duration, mut stop_rx: watch::Receiver<bool>) {
        let _session = VolumeSession::begin(Arc::clone(&self.volume));
        info!(?interval, "polling loop started");

        loop {
            if *stop_rx.borrow() {
                break;
            }
            self.poll_once();
            tokio::select! {
                changed = stop_rx.changed() => {
                    // A dropped sender means the monitor itself is gone.
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("polling loop stopped");
    }

    /// Sample every signal that has listeners and dispatch transitions
    pub fn poll_once(&self) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());

        if self.registry.has_listeners(EventCategory::Battery) {
            match self.battery.read() {
                Ok(Some(reading)) => {
                    if let Some((percent, plugged)) =
                        states.battery.evaluate((reading.percent, reading.plugged))
                    {
                        self.registry.dispatch(&Event::Battery { percent, plugged });
                    }
                }
                Ok(None) => debug!("battery unavailable"),
                Err(e) => warn!(?e, "battery query failed"),
            }
        }

        if self.registry.has_listeners(EventCategory::Network) {
            match self.network.any_interface_up() {
                Ok(up) => {
                    if let Some(connected) = states.network.evaluate(up) {
                        self.registry.dispatch(&Event::Network { connected });
                    }
                }
                Err(e) => warn!(?e, "network query failed"),
            }
        }

        let wants_threshold = self.registry.has_listeners(EventCategory::VolumeThreshold);
        let wants_mute = self.registry.has_listeners(EventCategory::VolumeMute);
        if wants_threshold || wants_mute {
            // One query covers both volume signals.
            match self.volume.read() {
                Ok(reading) => {
                    if wants_threshold {
                        if let Some(volume) = reading.volume {
                            let threshold = self
                                .registry
                                .first_volume_threshold()
                                .unwrap_or(DEFAULT_VOLUME_THRESHOLD);
                            if states.volume_above.evaluate(volume >= threshold).is_some() {
                                self.registry.dispatch(&Event::VolumeThreshold { volume });
                            }
                        }
                    }
                    if wants_mute {
                        if let Some(muted) = reading.muted {
                            if let Some(muted) = states.mute.evaluate(muted) {
                                self.registry.dispatch(&Event::VolumeMute { muted });
                            }
                        }
                    }
                }
                Err(e) => warn!(?e, "volume query failed"),
            }
        }
    }
}
