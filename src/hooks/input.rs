//! rdev-backed global input hooks
//!
//! `rdev::listen` blocks its thread for the life of the process, so each
//! hook spawns its capture thread once and gates delivery with a running
//! flag: `stop()` silences the handler rather than tearing the OS hook
//! down, and a later `start()` reuses the same thread with a fresh
//! handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use rdev::{Button, EventType};
use tracing::warn;

use super::{KeyboardHandler, KeyboardHook, MouseHandler, MouseHook, RawKeyboardEvent, RawMouseEvent};
use crate::event::MouseButton;

/// Global keyboard capture via rdev
#[derive(Default)]
pub struct RdevKeyboardHook {
    running: Arc<AtomicBool>,
    handler: Arc<Mutex<Option<KeyboardHandler>>>,
    spawned: bool,
}

impl RdevKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyboardHook for RdevKeyboardHook {
    fn start(&mut self, handler: KeyboardHandler) -> anyhow::Result<()> {
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
        self.running.store(true, Ordering::SeqCst);

        if !self.spawned {
            let running = Arc::clone(&self.running);
            let handler = Arc::clone(&self.handler);
            thread::Builder::new()
                .name("keynet-keyboard".to_string())
                .spawn(move || {
                    let callback = move |event: rdev::Event| {
                        if !running.load(Ordering::SeqCst) {
                            return;
                        }
                        let raw = match event.event_type {
                            EventType::KeyPress(key) => RawKeyboardEvent::Press {
                                key,
                                text: event.name,
                            },
                            EventType::KeyRelease(key) => RawKeyboardEvent::Release {
                                key,
                                text: event.name,
                            },
                            _ => return,
                        };
                        if let Some(h) = &*handler.lock().unwrap_or_else(|e| e.into_inner()) {
                            h(raw);
                        }
                    };
                    if let Err(e) = rdev::listen(callback) {
                        warn!(?e, "keyboard capture ended");
                    }
                })?;
            self.spawned = true;
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Global mouse capture via rdev
///
/// rdev reports no coordinates on button and wheel events, so the capture
/// thread remembers the last pointer position and stamps it onto clicks
/// and scrolls.
#[derive(Default)]
pub struct RdevMouseHook {
    running: Arc<AtomicBool>,
    handler: Arc<Mutex<Option<MouseHandler>>>,
    spawned: bool,
}

impl RdevMouseHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MouseHook for RdevMouseHook {
    fn start(&mut self, handler: MouseHandler) -> anyhow::Result<()> {
        *self.handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
        self.running.store(true, Ordering::SeqCst);

        if !self.spawned {
            let running = Arc::clone(&self.running);
            let handler = Arc::clone(&self.handler);
            thread::Builder::new()
                .name("keynet-mouse".to_string())
                .spawn(move || {
                    let mut last_pos = (0.0, 0.0);
                    let callback = move |event: rdev::Event| {
                        let raw = match event.event_type {
                            EventType::MouseMove { x, y } => {
                                last_pos = (x, y);
                                RawMouseEvent::Move { x, y }
                            }
                            EventType::ButtonPress(button) => RawMouseEvent::Click {
                                x: last_pos.0,
                                y: last_pos.1,
                                button: map_button(button),
                                pressed: true,
                            },
                            EventType::ButtonRelease(button) => RawMouseEvent::Click {
                                x: last_pos.0,
                                y: last_pos.1,
                                button: map_button(button),
                                pressed: false,
                            },
                            EventType::Wheel { delta_x, delta_y } => RawMouseEvent::Scroll {
                                x: last_pos.0,
                                y: last_pos.1,
                                dx: delta_x,
                                dy: delta_y,
                            },
                            _ => return,
                        };
                        if !running.load(Ordering::SeqCst) {
                            return;
                        }
                        if let Some(h) = &*handler.lock().unwrap_or_else(|e| e.into_inner()) {
                            h(raw);
                        }
                    };
                    if let Err(e) = rdev::listen(callback) {
                        warn!(?e, "mouse capture ended");
                    }
                })?;
            self.spawned = true;
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

fn map_button(button: Button) -> MouseButton {
    match button {
        Button::Left => MouseButton::Left,
        Button::Right => MouseButton::Right,
        Button::Middle => MouseButton::Middle,
        Button::Unknown(code) => MouseButton::Other(code),
    }
}
