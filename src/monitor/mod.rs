//! The monitor facade: construction, registration, and lifecycle
//!
//! A [`Monitor`] owns its listener registry, pressed-key tracker, and
//! per-signal state; nothing is process-global. `start()` brings up the
//! keyboard hook, the mouse hook, and the polling task; `stop()` signals
//! the task, awaits it, and silences the hooks. Callbacks always run
//! synchronously on whichever actor delivered the event.

mod poll;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::event::{Event, Trigger};
use crate::hooks::{
    KeyboardHandler, KeyboardHook, MouseHandler, MouseHook, RawKeyboardEvent, RawMouseEvent,
    RdevKeyboardHook, RdevMouseHook,
};
use crate::keys::{normalize, KeyStateTracker};
use crate::registry::ListenerRegistry;
use crate::signals::{
    default_battery_source, default_network_source, default_volume_source, BatterySource,
    NetworkSource, VolumeSource,
};
use poll::{Poller, SignalStates};

/// Default interval between polling iterations
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Host-event monitor with an explicit lifecycle
///
/// Register listeners, then `start()`. Registration is accepted at any
/// time, but the intended pattern is registration-before-start; polled
/// signals are only sampled while at least one listener observes them.
pub struct Monitor {
    registry: Arc<ListenerRegistry>,
    tracker: Arc<KeyStateTracker>,
    states: Arc<Mutex<SignalStates>>,
    keyboard: Box<dyn KeyboardHook>,
    mouse: Box<dyn MouseHook>,
    battery: Arc<dyn BatterySource>,
    network: Arc<dyn NetworkSource>,
    volume: Arc<dyn VolumeSource>,
    poll_interval: Duration,
    stop_tx: Option<watch::Sender<bool>>,
    poll_task: Option<JoinHandle<()>>,
}

impl Monitor {
    /// A monitor wired to this platform's default hooks and signal sources
    pub fn new() -> Self {
        Self::with_backends(
            Box::new(RdevKeyboardHook::new()),
            Box::new(RdevMouseHook::new()),
            default_battery_source().into(),
            default_network_source().into(),
            default_volume_source().into(),
        )
    }

    /// A monitor with injected hooks and signal sources
    pub fn with_backends(
        keyboard: Box<dyn KeyboardHook>,
        mouse: Box<dyn MouseHook>,
        battery: Arc<dyn BatterySource>,
        network: Arc<dyn NetworkSource>,
        volume: Arc<dyn VolumeSource>,
    ) -> Self {
        Self {
            registry: Arc::new(ListenerRegistry::new()),
            tracker: Arc::new(KeyStateTracker::new()),
            states: Arc::new(Mutex::new(SignalStates::default())),
            keyboard,
            mouse,
            battery,
            network,
            volume,
            poll_interval: DEFAULT_POLL_INTERVAL,
            stop_tx: None,
            poll_task: None,
        }
    }

    /// Override the polling interval (defaults to one second)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Register a listener for `trigger`'s category
    ///
    /// Dispatch order within a category is registration order, and the
    /// same callback registered twice fires twice. Subscriptions live
    /// until the monitor is dropped.
    pub fn register<F>(&self, trigger: Trigger, callback: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.register(trigger, Box::new(callback));
    }

    /// Whether `start()` has run without a matching `stop()`
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// Start both input hooks and the polling task
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`Error::AlreadyRunning`] if the monitor is already started.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        self.keyboard
            .start(keyboard_bridge(&self.registry, &self.tracker))
            .map_err(Error::HookStart)?;
        if let Err(e) = self.mouse.start(mouse_bridge(&self.registry)) {
            self.keyboard.stop();
            return Err(Error::HookStart(e));
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let poller = Poller {
            registry: Arc::clone(&self.registry),
            states: Arc::clone(&self.states),
            battery: Arc::clone(&self.battery),
            network: Arc::clone(&self.network),
            volume: Arc::clone(&self.volume),
        };
        self.poll_task = Some(tokio::spawn(poller.run(self.poll_interval, stop_rx)));
        self.stop_tx = Some(stop_tx);

        info!("monitor started");
        Ok(())
    }

    /// Stop the polling task and silence both hooks
    ///
    /// The task observes the stop flag between iterations, so this
    /// resolves within about one poll interval. Stopping a stopped
    /// monitor is a no-op. Signal state is retained: a later `start()`
    /// fires only on transitions since the last observed values.
    pub async fn stop(&mut self) {
        let Some(stop_tx) = self.stop_tx.take() else {
            return;
        };
        let _ = stop_tx.send(true);

        self.keyboard.stop();
        self.mouse.stop();

        if let Some(task) = self.poll_task.take() {
            if let Err(e) = task.await {
                warn!(?e, "polling task ended abnormally");
            }
        }
        info!("monitor stopped");
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard side of the raw input bridge
///
/// Press: normalize, track, dispatch `KeyPress`, then re-test every combo
/// against a fresh snapshot (combos re-fire on any press while held).
/// Release: normalize, untrack, dispatch `KeyRelease`.
fn keyboard_bridge(
    registry: &Arc<ListenerRegistry>,
    tracker: &Arc<KeyStateTracker>,
) -> KeyboardHandler {
    let registry = Arc::clone(registry);
    let tracker = Arc::clone(tracker);
    Box::new(move |raw| match raw {
        RawKeyboardEvent::Press { key, .. } => {
            let token = normalize(key);
            tracker.press(token.clone());
            registry.dispatch(&Event::KeyPress { key: token });
            registry.dispatch_combos(&tracker.snapshot());
        }
        RawKeyboardEvent::Release { key, .. } => {
            let token = normalize(key);
            tracker.release(&token);
            registry.dispatch(&Event::KeyRelease { key: token });
        }
    })
}

/// Mouse side of the raw input bridge: pass-through, no state tracking
fn mouse_bridge(registry: &Arc<ListenerRegistry>) -> MouseHandler {
    let registry = Arc::clone(registry);
    Box::new(move |raw| {
        let event = match raw {
            RawMouseEvent::Click {
                x,
                y,
                button,
                pressed,
            } => Event::MouseClick {
                x,
                y,
                button,
                pressed,
            },
            RawMouseEvent::Move { x, y } => Event::MouseMove { x, y },
            RawMouseEvent::Scroll { x, y, dx, dy } => Event::MouseScroll { x, y, dx, dy },
        };
        registry.dispatch(&event);
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::event::MouseButton;
    use crate::signals::{BatteryReading, VolumeReading};

    /// Hook that hands its handler to the test for direct injection
    #[derive(Default)]
    struct InjectedKeyboard {
        handler: Arc<Mutex<Option<KeyboardHandler>>>,
    }

    impl KeyboardHook for InjectedKeyboard {
        fn start(&mut self, handler: KeyboardHandler) -> anyhow::Result<()> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(())
        }

        fn stop(&mut self) {}
    }

    #[derive(Default)]
    struct InjectedMouse {
        handler: Arc<Mutex<Option<MouseHandler>>>,
    }

    impl MouseHook for InjectedMouse {
        fn start(&mut self, handler: MouseHandler) -> anyhow::Result<()> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(())
        }

        fn stop(&mut self) {}
    }

    struct SteadyBattery {
        reading: BatteryReading,
        calls: Arc<AtomicUsize>,
    }

    impl BatterySource for SteadyBattery {
        fn read(&self) -> anyhow::Result<Option<BatteryReading>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.reading))
        }
    }

    struct NoNetwork;

    impl NetworkSource for NoNetwork {
        fn any_interface_up(&self) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    struct NoVolume;

    impl VolumeSource for NoVolume {
        fn read(&self) -> anyhow::Result<VolumeReading> {
            Ok(VolumeReading::default())
        }
    }

    struct TestRig {
        monitor: Monitor,
        keyboard: Arc<Mutex<Option<KeyboardHandler>>>,
        mouse: Arc<Mutex<Option<MouseHandler>>>,
        battery_calls: Arc<AtomicUsize>,
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    fn rig() -> TestRig {
        init_tracing();
        let keyboard = InjectedKeyboard::default();
        let mouse = InjectedMouse::default();
        let keyboard_handler = Arc::clone(&keyboard.handler);
        let mouse_handler = Arc::clone(&mouse.handler);
        let battery_calls = Arc::new(AtomicUsize::new(0));

        let monitor = Monitor::with_backends(
            Box::new(keyboard),
            Box::new(mouse),
            Arc::new(SteadyBattery {
                reading: BatteryReading {
                    percent: 80,
                    plugged: true,
                },
                calls: Arc::clone(&battery_calls),
            }),
            Arc::new(NoNetwork),
            Arc::new(NoVolume),
        )
        .with_poll_interval(Duration::from_millis(10));

        TestRig {
            monitor,
            keyboard: keyboard_handler,
            mouse: mouse_handler,
            battery_calls,
        }
    }

    fn press(rig: &TestRig, key: rdev::Key, text: Option<&str>) {
        let guard = rig.keyboard.lock().unwrap();
        guard.as_ref().unwrap()(RawKeyboardEvent::Press {
            key,
            text: text.map(|s| s.to_string()),
        });
    }

    fn release(rig: &TestRig, key: rdev::Key) {
        let guard = rig.keyboard.lock().unwrap();
        guard.as_ref().unwrap()(RawKeyboardEvent::Release { key, text: None });
    }

    #[tokio::test]
    async fn test_combo_fires_and_refires_while_held() {
        let mut rig = rig();
        let combo_fires = Arc::new(AtomicUsize::new(0));
        let press_fires = Arc::new(AtomicUsize::new(0));

        let fires = Arc::clone(&combo_fires);
        rig.monitor.register(
            Trigger::KeyCombo {
                keys: vec!["ctrl".into(), "c".into()],
            },
            move |_| {
                fires.fetch_add(1, Ordering::SeqCst);
            },
        );
        let fires = Arc::clone(&press_fires);
        rig.monitor.register(Trigger::KeyPress, move |_| {
            fires.fetch_add(1, Ordering::SeqCst);
        });

        rig.monitor.start().unwrap();

        press(&rig, rdev::Key::ControlLeft, None);
        assert_eq!(combo_fires.load(Ordering::SeqCst), 0);

        press(&rig, rdev::Key::KeyC, Some("c"));
        assert_eq!(combo_fires.load(Ordering::SeqCst), 1);

        // An unrelated press while the combo is still held re-fires it.
        press(&rig, rdev::Key::KeyX, Some("x"));
        assert_eq!(combo_fires.load(Ordering::SeqCst), 2);

        // Release breaks the subset; the next press doesn't fire.
        release(&rig, rdev::Key::KeyC);
        press(&rig, rdev::Key::KeyX, Some("x"));
        assert_eq!(combo_fires.load(Ordering::SeqCst), 2);

        assert_eq!(press_fires.load(Ordering::SeqCst), 4);
        rig.monitor.stop().await;
    }

    #[tokio::test]
    async fn test_mouse_events_pass_through() {
        let mut rig = rig();
        let log = Arc::new(Mutex::new(Vec::new()));
        for trigger in [Trigger::MouseClick, Trigger::MouseMove, Trigger::MouseScroll] {
            let log = Arc::clone(&log);
            rig.monitor
                .register(trigger, move |e| log.lock().unwrap().push(e.clone()));
        }

        rig.monitor.start().unwrap();
        {
            let guard = rig.mouse.lock().unwrap();
            let handler = guard.as_ref().unwrap();
            handler(RawMouseEvent::Move { x: 10.0, y: 20.0 });
            handler(RawMouseEvent::Click {
                x: 10.0,
                y: 20.0,
                button: MouseButton::Left,
                pressed: true,
            });
            handler(RawMouseEvent::Scroll {
                x: 10.0,
                y: 20.0,
                dx: 0,
                dy: -3,
            });
        }

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], Event::MouseMove { x: 10.0, y: 20.0 });
        assert_eq!(
            log[2],
            Event::MouseScroll {
                x: 10.0,
                y: 20.0,
                dx: 0,
                dy: -3
            }
        );
        drop(log);
        rig.monitor.stop().await;
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut rig = rig();
        rig.monitor.start().unwrap();
        assert!(matches!(rig.monitor.start(), Err(Error::AlreadyRunning)));
        rig.monitor.stop().await;
        assert!(!rig.monitor.is_running());
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let mut rig = rig();
        tokio_test::block_on(rig.monitor.stop());
        assert!(!rig.monitor.is_running());
    }

    #[tokio::test]
    async fn test_signal_state_persists_across_restart() {
        let mut rig = rig();
        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);
        rig.monitor.register(Trigger::Battery, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        rig.monitor.start().unwrap();
        while rig.battery_calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        rig.monitor.stop().await;
        assert_eq!(fires.load(Ordering::SeqCst), 1);

        // The reading is unchanged, so a restart must not re-fire: the
        // last-value memory survives stop/start.
        let calls_before = rig.battery_calls.load(Ordering::SeqCst);
        rig.monitor.start().unwrap();
        while rig.battery_calls.load(Ordering::SeqCst) == calls_before {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        rig.monitor.stop().await;
        assert_eq!(fires.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_key_press_and_release_dispatch_tokens() {
        let mut rig = rig();
        let log = Arc::new(Mutex::new(Vec::new()));
        for trigger in [Trigger::KeyPress, Trigger::KeyRelease] {
            let log = Arc::clone(&log);
            rig.monitor
                .register(trigger, move |e| log.lock().unwrap().push(e.clone()));
        }

        rig.monitor.start().unwrap();
        press(&rig, rdev::Key::KeyA, Some("A"));
        release(&rig, rdev::Key::KeyA);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::KeyPress { key: "a".into() },
                Event::KeyRelease { key: "a".into() },
            ]
        );
        rig.monitor.stop().await;
    }

    #[tokio::test]
    async fn test_unknown_key_release_clears_held_state() {
        // Unknown keys report text on press but not on release. Both sides
        // must map to the same token, otherwise the released key would stay
        // in the pressed set and keep satisfying combos.
        let mut rig = rig();
        let combo_fires = Arc::new(AtomicUsize::new(0));

        let fires = Arc::clone(&combo_fires);
        rig.monitor.register(
            Trigger::KeyCombo {
                keys: vec!["ctrl".into(), "unknown191".into()],
            },
            move |_| {
                fires.fetch_add(1, Ordering::SeqCst);
            },
        );

        rig.monitor.start().unwrap();
        press(&rig, rdev::Key::ControlLeft, None);
        press(&rig, rdev::Key::Unknown(191), Some("§"));
        assert_eq!(combo_fires.load(Ordering::SeqCst), 1);

        release(&rig, rdev::Key::Unknown(191));
        press(&rig, rdev::Key::ControlLeft, None);
        assert_eq!(combo_fires.load(Ordering::SeqCst), 1);
        rig.monitor.stop().await;
    }
}
