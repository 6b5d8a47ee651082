//! Key token normalization
//!
//! Every raw key event maps to exactly one lowercase token, the same on
//! press and release. Printable keys become their character, named keys a
//! lowercase name, and left/right modifier variants collapse so a combo
//! written as `"ctrl"` matches either physical key.

use rdev::Key;
use serde::{Deserialize, Serialize};

/// Normalized lowercase identity of one key, compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Build a token from an already-normalized spelling (lowercased here
    /// so hand-written combo keys like `"Ctrl"` still match)
    pub fn new(spelling: impl Into<String>) -> Self {
        KeyToken(spelling.into().to_lowercase())
    }

    /// The token's string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyToken {
    fn from(s: &str) -> Self {
        KeyToken::new(s)
    }
}

/// Normalize a raw key into its [`KeyToken`]
///
/// Total and deterministic: the token is derived from the key's structural
/// identity alone. Hook-reported text is never consulted, since hooks report
/// it on press but usually not on release, and the token must be identical
/// on both.
pub fn normalize(key: Key) -> KeyToken {
    if let Some(spelling) = structural_name(key) {
        return KeyToken(spelling.to_string());
    }

    let cleaned: String = format!("{:?}", key)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    KeyToken(cleaned)
}

/// Fixed spelling for keys with a structural identity
fn structural_name(key: Key) -> Option<&'static str> {
    let name = match key {
        Key::ControlLeft | Key::ControlRight => "ctrl",
        Key::ShiftLeft | Key::ShiftRight => "shift",
        Key::Alt => "alt",
        Key::AltGr => "altgr",
        Key::MetaLeft | Key::MetaRight => "meta",

        Key::KeyA => "a",
        Key::KeyB => "b",
        Key::KeyC => "c",
        Key::KeyD => "d",
        Key::KeyE => "e",
        Key::KeyF => "f",
        Key::KeyG => "g",
        Key::KeyH => "h",
        Key::KeyI => "i",
        Key::KeyJ => "j",
        Key::KeyK => "k",
        Key::KeyL => "l",
        Key::KeyM => "m",
        Key::KeyN => "n",
        Key::KeyO => "o",
        Key::KeyP => "p",
        Key::KeyQ => "q",
        Key::KeyR => "r",
        Key::KeyS => "s",
        Key::KeyT => "t",
        Key::KeyU => "u",
        Key::KeyV => "v",
        Key::KeyW => "w",
        Key::KeyX => "x",
        Key::KeyY => "y",
        Key::KeyZ => "z",

        Key::Num0 | Key::Kp0 => "0",
        Key::Num1 | Key::Kp1 => "1",
        Key::Num2 | Key::Kp2 => "2",
        Key::Num3 | Key::Kp3 => "3",
        Key::Num4 | Key::Kp4 => "4",
        Key::Num5 | Key::Kp5 => "5",
        Key::Num6 | Key::Kp6 => "6",
        Key::Num7 | Key::Kp7 => "7",
        Key::Num8 | Key::Kp8 => "8",
        Key::Num9 | Key::Kp9 => "9",

        Key::Minus | Key::KpMinus => "-",
        Key::Equal => "=",
        Key::KpPlus => "+",
        Key::KpMultiply => "*",
        Key::Slash | Key::KpDivide => "/",
        Key::Comma => ",",
        Key::Dot => ".",
        Key::SemiColon => ";",
        Key::Quote => "'",
        Key::BackQuote => "`",
        Key::BackSlash | Key::IntlBackslash => "\\",
        Key::LeftBracket => "[",
        Key::RightBracket => "]",

        Key::Space => "space",
        Key::Return | Key::KpReturn => "enter",
        Key::Escape => "esc",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Delete | Key::KpDelete => "delete",
        Key::Insert => "insert",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "pageup",
        Key::PageDown => "pagedown",
        Key::UpArrow => "up",
        Key::DownArrow => "down",
        Key::LeftArrow => "left",
        Key::RightArrow => "right",
        Key::CapsLock => "capslock",

        _ => return None,
    };
    Some(name)
}
