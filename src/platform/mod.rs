//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (leaderboard timestamps)
//! - Raw key events fed to text prompts

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A key press as seen by text entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Char(char),
    Backspace,
    Enter,
    /// Anything else (arrows, modifiers, function keys)
    Other,
}

impl KeyEvent {
    /// Map a DOM-style key name ("a", "Backspace", "Enter", "Shift")
    pub fn from_key_name(key: &str) -> Self {
        match key {
            "Backspace" => KeyEvent::Backspace,
            "Enter" => KeyEvent::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyEvent::Char(c),
                    _ => KeyEvent::Other,
                }
            }
        }
    }
}
