//! Keyboard input simulation for turning pages.
//!
//! On Windows the key press is sent with SendInput, which simulates
//! hardware-level input and goes to whichever window has focus. The reader
//! window must therefore be in the foreground while capturing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key that advances the e-reader by one page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextPageKey {
    #[default]
    Right,
    Left,
    Space,
    PageDown,
}

impl fmt::Display for NextPageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextPageKey::Right => write!(f, "Right arrow"),
            NextPageKey::Left => write!(f, "Left arrow"),
            NextPageKey::Space => write!(f, "Space"),
            NextPageKey::PageDown => write!(f, "Page Down"),
        }
    }
}

#[cfg(windows)]
pub use self::windows_input::press_key;

#[cfg(windows)]
mod windows_input {
    use anyhow::{anyhow, Result};
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
        KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, VIRTUAL_KEY, VK_LEFT, VK_NEXT, VK_RIGHT,
        VK_SPACE,
    };

    use super::NextPageKey;

    fn virtual_key(key: NextPageKey) -> (VIRTUAL_KEY, KEYBD_EVENT_FLAGS) {
        // Arrow and navigation keys live on the extended keypad
        match key {
            NextPageKey::Right => (VK_RIGHT, KEYEVENTF_EXTENDEDKEY),
            NextPageKey::Left => (VK_LEFT, KEYEVENTF_EXTENDEDKEY),
            NextPageKey::PageDown => (VK_NEXT, KEYEVENTF_EXTENDEDKEY),
            NextPageKey::Space => (VK_SPACE, KEYBD_EVENT_FLAGS(0)),
        }
    }

    fn keyboard_input(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    dwFlags: flags,
                    ..Default::default()
                },
            },
        }
    }

    /// Sends a key down/up pair to the foreground window.
    pub fn press_key(key: NextPageKey) -> Result<()> {
        let (vk, flags) = virtual_key(key);
        let inputs = [
            keyboard_input(vk, flags),
            keyboard_input(vk, flags | KEYEVENTF_KEYUP),
        ];

        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(anyhow!(
                "SendInput delivered {} of {} key events for {}",
                sent,
                inputs.len(),
                key
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_deserialize() {
        let key: NextPageKey = serde_json::from_str(r#""page_down""#).unwrap();
        assert_eq!(key, NextPageKey::PageDown);
        assert!(serde_json::from_str::<NextPageKey>(r#""enter""#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(NextPageKey::Right.to_string(), "Right arrow");
        assert_eq!(NextPageKey::Space.to_string(), "Space");
    }
}
