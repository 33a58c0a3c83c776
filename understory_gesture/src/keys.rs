// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modifier key tracking.
//!
//! Pointer gestures often change meaning while a modifier is held. The host
//! feeds its `keydown`/`keyup` events to a [`KeyTracker`], and recognizer
//! listeners read [`Modifiers`] from it instead of from each pointer event.
//!
//! Which key code is "meta" depends on the host: WebKit on macOS reports the
//! command keys as 91 and 93, Gecko on macOS as 224, and everything else
//! treats Ctrl (17) as the platform's primary modifier. [`KeyPlatform`]
//! selects the mapping.
//!
//! ```
//! use understory_gesture::keys::{KeyEvent, KeyPlatform, KeyTracker, Modifiers};
//!
//! let mut keys = KeyTracker::new(KeyPlatform::MacWebKit);
//! keys.track(&KeyEvent::down(91));
//! keys.track(&KeyEvent::down(16).shift(true));
//! assert_eq!(keys.modifiers(), Modifiers::META | Modifiers::SHIFT);
//! assert_eq!(keys.key_id(91), "Meta");
//! assert_eq!(keys.key_id(16), "Shift");
//!
//! keys.track(&KeyEvent::up(91));
//! assert_eq!(keys.modifiers(), Modifiers::SHIFT);
//! ```

bitflags::bitflags! {
    /// Modifier keys currently held.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// The platform's primary modifier (command on macOS).
        const META  = 0b0_0001;
        /// Escape.
        const ESC   = 0b0_0010;
        /// Control.
        const CTRL  = 0b0_0100;
        /// Shift.
        const SHIFT = 0b0_1000;
        /// Alt / option.
        const ALT   = 0b1_0000;
    }
}

/// Key code of Escape.
pub const ESCAPE: u32 = 27;

/// How the host reports the meta key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyPlatform {
    /// WebKit and Blink on macOS: left and right command are 91 and 93.
    MacWebKit,
    /// Gecko on macOS: command is 224.
    MacGecko,
    /// Windows, Linux and others: Ctrl (17) acts as meta.
    #[default]
    Other,
}

impl KeyPlatform {
    /// Returns `true` if `key_code` is the meta key on this platform.
    #[must_use]
    pub const fn is_meta(self, key_code: u32) -> bool {
        match self {
            Self::MacWebKit => matches!(key_code, 91 | 93),
            Self::MacGecko => key_code == 224,
            Self::Other => key_code == 17,
        }
    }
}

/// A `keydown` or `keyup` as the host reports it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// `true` for `keydown`.
    pub down: bool,
    /// Legacy numeric key code.
    pub key_code: u32,
    /// The event's `ctrlKey` flag.
    pub ctrl: bool,
    /// The event's `shiftKey` flag.
    pub shift: bool,
    /// The event's `altKey` flag.
    pub alt: bool,
}

impl KeyEvent {
    /// A `keydown` of `key_code` with no modifier flags.
    #[must_use]
    pub const fn down(key_code: u32) -> Self {
        Self {
            down: true,
            key_code,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    /// A `keyup` of `key_code` with no modifier flags.
    #[must_use]
    pub const fn up(key_code: u32) -> Self {
        Self {
            down: false,
            ..Self::down(key_code)
        }
    }

    /// Sets the `ctrlKey` flag.
    #[must_use]
    pub const fn ctrl(mut self, on: bool) -> Self {
        self.ctrl = on;
        self
    }

    /// Sets the `shiftKey` flag.
    #[must_use]
    pub const fn shift(mut self, on: bool) -> Self {
        self.shift = on;
        self
    }

    /// Sets the `altKey` flag.
    #[must_use]
    pub const fn alt(mut self, on: bool) -> Self {
        self.alt = on;
        self
    }
}

/// Tracks held modifiers across key events.
#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    platform: KeyPlatform,
    modifiers: Modifiers,
}

impl KeyTracker {
    /// Creates a tracker with nothing held.
    #[must_use]
    pub fn new(platform: KeyPlatform) -> Self {
        Self {
            platform,
            modifiers: Modifiers::empty(),
        }
    }

    /// The platform mapping in use.
    #[must_use]
    pub fn platform(&self) -> KeyPlatform {
        self.platform
    }

    /// Modifiers currently held.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Releases every modifier, e.g. when the host window loses focus.
    pub fn reset(&mut self) {
        self.modifiers = Modifiers::empty();
    }

    /// Updates the held modifiers from one key event.
    ///
    /// Escape and meta follow their own key's down and up. Ctrl, shift and
    /// alt are taken from the event's flags, so a release missed while the
    /// host was unfocused corrects itself on the next key.
    pub fn track(&mut self, event: &KeyEvent) {
        if event.key_code == ESCAPE {
            self.modifiers.set(Modifiers::ESC, event.down);
        }
        if self.platform.is_meta(event.key_code) {
            self.modifiers.set(Modifiers::META, event.down);
        }
        self.modifiers.set(Modifiers::CTRL, event.ctrl);
        self.modifiers.set(Modifiers::SHIFT, event.shift);
        self.modifiers.set(Modifiers::ALT, event.alt);
    }

    /// Name of `key_code`, or `""` if it has none.
    #[must_use]
    pub fn key_id(&self, key_code: u32) -> &'static str {
        if self.platform.is_meta(key_code) {
            return "Meta";
        }
        key_name(key_code)
    }
}

const LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];
const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
const NUMPAD: [&str; 10] = [
    "Numpad0", "Numpad1", "Numpad2", "Numpad3", "Numpad4", "Numpad5", "Numpad6", "Numpad7",
    "Numpad8", "Numpad9",
];
const FUNCTION: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Platform-independent key names.
fn key_name(key_code: u32) -> &'static str {
    let at = |table: &[&'static str], first: u32| table[(key_code - first) as usize];
    match key_code {
        8 => "Backspace",
        9 => "Tab",
        13 => "Enter",
        16 => "Shift",
        17 => "Ctrl",
        18 => "Alt",
        19 => "PauseBreak",
        20 => "CapsLock",
        27 => "Escape",
        33 => "PageUp",
        34 => "PageDown",
        35 => "End",
        36 => "Home",
        37 => "Left",
        38 => "Up",
        39 => "Right",
        40 => "Down",
        45 => "Insert",
        46 => "Delete",
        48..=57 => at(&DIGITS, 48),
        65..=90 => at(&LETTERS, 65),
        91 => "LeftWindow",
        92 => "RightWindow",
        93 => "Select",
        96..=105 => at(&NUMPAD, 96),
        106 => "Multiply",
        107 => "Add",
        109 => "Subtract",
        110 => "DecimalPoint",
        111 => "Divide",
        112..=123 => at(&FUNCTION, 112),
        144 => "NumLock",
        145 => "ScrollLock",
        186 => "SemiColon",
        187 => "EqualSign",
        188 => "Comma",
        189 => "Dash",
        190 => "Period",
        191 => "ForwardSlash",
        192 => "GraveAccent",
        219 => "OpenBracket",
        220 => "Backslash",
        221 => "CloseBracket",
        222 => "SingleQuote",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_is_meta_off_mac() {
        let mut keys = KeyTracker::default();
        keys.track(&KeyEvent::down(17).ctrl(true));
        assert_eq!(keys.modifiers(), Modifiers::META | Modifiers::CTRL);
        assert_eq!(keys.key_id(17), "Meta");
        keys.track(&KeyEvent::up(17));
        assert!(keys.modifiers().is_empty());
    }

    #[test]
    fn flags_follow_each_event() {
        let mut keys = KeyTracker::new(KeyPlatform::MacGecko);
        keys.track(&KeyEvent::down(ESCAPE).alt(true));
        assert_eq!(keys.modifiers(), Modifiers::ESC | Modifiers::ALT);
        // The alt release was missed; the next key carries the truth.
        keys.track(&KeyEvent::down(65));
        assert_eq!(keys.modifiers(), Modifiers::ESC);
        keys.track(&KeyEvent::down(224));
        keys.reset();
        assert!(keys.modifiers().is_empty());
    }

    #[test]
    fn names_cover_ranges() {
        let keys = KeyTracker::new(KeyPlatform::MacWebKit);
        assert_eq!(keys.key_id(48), "0");
        assert_eq!(keys.key_id(90), "Z");
        assert_eq!(keys.key_id(105), "Numpad9");
        assert_eq!(keys.key_id(123), "F12");
        assert_eq!(keys.key_id(17), "Ctrl");
        assert_eq!(keys.key_id(93), "Meta");
        assert_eq!(keys.key_id(92), "RightWindow");
        assert_eq!(keys.key_id(108), "");
    }
}
