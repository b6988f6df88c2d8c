//! Key model and hotkey parsing.
//!
//! Keys are identified by what they print (`a`, `\`, `;`) or by name
//! (`Space`, `Alt`). The platform key-state source maps its own key codes
//! onto [`Key`]; the core only ever asks "is this key down right now?".

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physical key the core can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Printable key: lowercase letter, digit, or punctuation.
    Char(char),
    Space,
    Enter,
    Tab,
    Escape,
    Alt,
    Control,
    Shift,
    Meta,
}

/// Punctuation keys recognized by [`Key::from_name`].
const PUNCTUATION: &[char] = &['\\', '/', ';', ',', '.', '\'', '[', ']', '-', '=', '`'];

impl Key {
    /// The key for a letter, case-insensitive. `None` for non-letters.
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Key::Char(c.to_ascii_lowercase()))
    }

    /// The lowercase letter this key types, if it is a letter key.
    pub fn as_letter(self) -> Option<char> {
        match self {
            Key::Char(c) if c.is_ascii_lowercase() => Some(c),
            _ => None,
        }
    }

    /// All letter keys in `a..=z` order (the sequencer's scan order).
    pub fn letters() -> impl Iterator<Item = Key> {
        ('a'..='z').map(Key::Char)
    }

    /// Whether this is one of the four modifier keys.
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Alt | Key::Control | Key::Shift | Key::Meta)
    }

    /// Parse a key name, case-insensitive.
    ///
    /// Accepts single printable characters (`a`, `7`, `\`) and the names
    /// `space`, `enter`/`return`, `tab`, `escape`/`esc`, `backslash`,
    /// `slash`, `semicolon`, `comma`, `period`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Some(Key::Char(c.to_ascii_lowercase()));
            }
            if PUNCTUATION.contains(&c) {
                return Some(Key::Char(c));
            }
            return None;
        }

        let key = match name.to_lowercase().as_str() {
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backslash" => Key::Char('\\'),
            "slash" => Key::Char('/'),
            "semicolon" => Key::Char(';'),
            "comma" => Key::Char(','),
            "period" => Key::Char('.'),
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Space => write!(f, "Space"),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Escape => write!(f, "Escape"),
            Key::Alt => write!(f, "Alt"),
            Key::Control => write!(f, "Ctrl"),
            Key::Shift => write!(f, "Shift"),
            Key::Meta => write!(f, "Meta"),
        }
    }
}

/// Source of live key state. Must report physical state with no debounce.
pub trait KeyStateSource {
    fn is_key_down(&self, key: Key) -> bool;
}

/// What a global hotkey does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotkeyAction {
    ToggleOverlay,
    ScrollUp,
    ScrollDown,
    Quit,
}

/// A modifier-plus-key combination such as `Alt+\`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: Key,
}

impl Hotkey {
    /// Parse a combo like `Alt+K` or `Ctrl+Alt+\`.
    ///
    /// Modifier names are case-insensitive: `ctrl`/`control`, `alt`/`option`,
    /// `shift`, `meta`/`cmd`/`super`/`win`. Exactly one non-modifier key is
    /// required, plus at least one of Ctrl, Alt or Meta. Shift alone is not
    /// enough: Shift plus a letter is still an ordinary letter press.
    pub fn parse(combo: &str) -> Option<Self> {
        let mut hotkey = Hotkey {
            control: false,
            alt: false,
            shift: false,
            meta: false,
            key: Key::Space,
        };
        let mut key = None;

        for part in combo.split('+') {
            let part = part.trim();
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => hotkey.control = true,
                "alt" | "option" => hotkey.alt = true,
                "shift" => hotkey.shift = true,
                "meta" | "cmd" | "command" | "super" | "win" => hotkey.meta = true,
                _ => {
                    if key.is_some() {
                        return None;
                    }
                    key = Some(Key::from_name(part)?);
                }
            }
        }

        hotkey.key = key?;
        if !(hotkey.control || hotkey.alt || hotkey.meta) {
            return None;
        }
        Some(hotkey)
    }

    /// Whether the key and exactly this set of modifiers are down.
    ///
    /// A modifier the combo does not name must be up, so `Ctrl+Alt+Q` does
    /// not trigger `Alt+Q`.
    pub fn is_down<S: KeyStateSource + ?Sized>(&self, source: &S) -> bool {
        source.is_key_down(Key::Control) == self.control
            && source.is_key_down(Key::Alt) == self.alt
            && source.is_key_down(Key::Shift) == self.shift
            && source.is_key_down(Key::Meta) == self.meta
            && source.is_key_down(self.key)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.control {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.meta {
            write!(f, "Meta+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;

    /// Key state driven by the test, one "physical" set of held keys.
    #[derive(Debug, Default)]
    pub struct FakeKeys {
        down: RefCell<HashSet<Key>>,
    }

    impl FakeKeys {
        pub fn press(&self, key: Key) {
            self.down.borrow_mut().insert(key);
        }

        pub fn release(&self, key: Key) {
            self.down.borrow_mut().remove(&key);
        }

        pub fn press_letter(&self, c: char) {
            self.press(Key::Char(c));
        }

        pub fn release_letter(&self, c: char) {
            self.release(Key::Char(c));
        }

        pub fn release_all(&self) {
            self.down.borrow_mut().clear();
        }
    }

    impl KeyStateSource for FakeKeys {
        fn is_key_down(&self, key: Key) -> bool {
            self.down.borrow().contains(&key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FakeKeys;
    use super::*;

    #[test]
    fn letter_keys_are_lowercase() {
        assert_eq!(Key::letter('Q'), Some(Key::Char('q')));
        assert_eq!(Key::letter('1'), None);
        assert_eq!(Key::Char('q').as_letter(), Some('q'));
        assert_eq!(Key::Char('\\').as_letter(), None);
        assert_eq!(Key::letters().count(), 26);
    }

    #[test]
    fn parse_default_bindings() {
        let toggle = Hotkey::parse("Alt+\\").unwrap();
        assert!(toggle.alt);
        assert!(!toggle.control);
        assert_eq!(toggle.key, Key::Char('\\'));

        let quit = Hotkey::parse("alt+q").unwrap();
        assert_eq!(quit.key, Key::Char('q'));
    }

    #[test]
    fn parse_named_and_multiple_modifiers() {
        let hk = Hotkey::parse("Ctrl+Option+Backslash").unwrap();
        assert!(hk.control && hk.alt);
        assert_eq!(hk.key, Key::Char('\\'));

        let hk = Hotkey::parse("Cmd+Shift+Space").unwrap();
        assert!(hk.meta && hk.shift);
        assert_eq!(hk.key, Key::Space);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Hotkey::parse("").is_none());
        assert!(Hotkey::parse("Alt").is_none());
        assert!(Hotkey::parse("K").is_none(), "modifier required");
        assert!(Hotkey::parse("Shift+K").is_none(), "shift alone is typing");
        assert!(Hotkey::parse("Shift+Alt+K").is_some());
        assert!(Hotkey::parse("Alt+K+J").is_none());
        assert!(Hotkey::parse("Alt+F13").is_none());
    }

    #[test]
    fn display_round_trips() {
        for combo in ["Alt+\\", "Ctrl+Alt+J", "Meta+Space"] {
            let hk = Hotkey::parse(combo).unwrap();
            assert_eq!(Hotkey::parse(&hk.to_string()), Some(hk));
        }
        assert_eq!(Hotkey::parse("alt+k").unwrap().to_string(), "Alt+K");
    }

    #[test]
    fn is_down_requires_modifier_and_key() {
        let keys = FakeKeys::default();
        let hk = Hotkey::parse("Alt+J").unwrap();

        keys.press_letter('j');
        assert!(!hk.is_down(&keys));

        keys.press(Key::Alt);
        assert!(hk.is_down(&keys));

        keys.release_letter('j');
        assert!(!hk.is_down(&keys));
    }

    #[test]
    fn extra_modifier_blocks_match() {
        let keys = FakeKeys::default();
        let quit = Hotkey::parse("Alt+Q").unwrap();
        keys.press(Key::Control);
        keys.press(Key::Alt);
        keys.press_letter('q');
        assert!(!quit.is_down(&keys));

        assert!(Hotkey::parse("Ctrl+Alt+Q").unwrap().is_down(&keys));
        keys.release(Key::Control);
        assert!(quit.is_down(&keys));
    }
}
