/// Per-key held/released tracking fed by the host's keyboard callback.
///
/// The host delivers raw key-down / key-up messages on its input path; the
/// tick loop then asks [`KeyStates::is_key_just_released`] once per tick for
/// every key it cares about.  Each call both observes the release edge and
/// advances that key's edge history, so polling a key twice in one tick (or
/// skipping a tick) desynchronizes it.
///
/// Both flags are atomics so the input callback may run on another thread
/// than the tick loop without any locking.
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of tracked virtual-key codes (`0..KEY_COUNT`).
pub const KEY_COUNT: usize = 255;

pub const VK_RETURN: u32 = 0x0D;
pub const VK_UP: u32 = 0x26;
pub const VK_DOWN: u32 = 0x28;
pub const VK_F9: u32 = 0x78;

pub struct KeyStates {
    down: [AtomicBool; KEY_COUNT],
    down_previous_tick: [AtomicBool; KEY_COUNT],
}

impl KeyStates {
    pub fn new() -> Self {
        Self {
            down: std::array::from_fn(|_| AtomicBool::new(false)),
            down_previous_tick: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    /// Records a raw key-down (`is_down = true`) or key-up message.
    /// Codes outside the tracked range are ignored.
    pub fn observe_raw_key(&self, code: u32, is_down: bool) {
        if let Some(i) = slot(code) {
            self.down[i].store(is_down, Ordering::Relaxed);
        }
    }

    /// Whether `code` is held right now.  Pure read; does not advance history.
    pub fn is_key_held(&self, code: u32) -> bool {
        slot(code).is_some_and(|i| self.down[i].load(Ordering::Relaxed))
    }

    /// Returns `true` exactly once per press: on the first poll after the key
    /// goes from held to released.
    pub fn is_key_just_released(&self, code: u32) -> bool {
        let Some(i) = slot(code) else { return false };
        let down = self.down[i].load(Ordering::Relaxed);
        let was_down = self.down_previous_tick[i].swap(down, Ordering::Relaxed);
        was_down && !down
    }

    /// Clears every key to not-held, not-previously-held.
    pub fn reset_all(&self) {
        for i in 0..KEY_COUNT {
            self.down[i].store(false, Ordering::Relaxed);
            self.down_previous_tick[i].store(false, Ordering::Relaxed);
        }
    }
}

impl Default for KeyStates {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(code: u32) -> Option<usize> {
    let i = code as usize;
    (i < KEY_COUNT).then_some(i)
}

/// Converts a key name (e.g. `"F9"`, `"A"`, `"Up"`) to a Windows virtual-key code.
///
/// Supported keys:
/// - Function keys `F1`–`F12` (case-insensitive).
/// - ASCII letters `A`–`Z` (normalised to their uppercase VK values, `0x41`–`0x5A`).
/// - ASCII digits `0`–`9` (VK values `0x30`–`0x39`).
/// - The navigation names `UP`, `DOWN` and `ENTER`.
///
/// Returns `None` for any unrecognised name.
pub fn parse_vk(name: &str) -> Option<u32> {
    match name.to_uppercase().as_str() {
        "UP" => Some(VK_UP),
        "DOWN" => Some(VK_DOWN),
        "ENTER" | "RETURN" => Some(VK_RETURN),
        s if s.len() >= 2 && s.starts_with('F') => match s[1..].parse::<u32>() {
            Ok(n @ 1..=12) => Some(0x6F + n),
            _ => None,
        },
        s if s.len() == 1 => {
            let c = s.chars().next()?;
            // 'A'=0x41…'Z'=0x5A; '0'=0x30…'9'=0x39 match the VK codes exactly.
            c.is_ascii_alphanumeric().then(|| c as u32)
        }
        _ => None,
    }
}

/// Inverse of [`parse_vk`] for display purposes; unknown codes render as hex.
pub fn vk_name(code: u32) -> String {
    match code {
        VK_UP => "Up".to_string(),
        VK_DOWN => "Down".to_string(),
        VK_RETURN => "Enter".to_string(),
        0x70..=0x7B => format!("F{}", code - 0x6F),
        0x30..=0x39 | 0x41..=0x5A => char::from(code as u8).to_string(),
        _ => format!("0x{code:02X}"),
    }
}
