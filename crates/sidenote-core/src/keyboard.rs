//! Single-key shortcuts for the sidebar.
//!
//! A [`KeyMap`] is a command table keyed by key combination. Dispatch is a
//! pure lookup; the sidebar applies the resulting [`Command`] against its
//! state at the moment the key arrives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::navigation::Direction;

/// A physical key, as far as the sidebar cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    Escape,
    Enter,
    Tab,
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    /// Whether the platform command modifier (Cmd or Ctrl) is held
    #[must_use]
    pub const fn platform(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// Key press without modifiers
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Character key press without modifiers
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// Add modifiers to a key press
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl FromStr for KeyInput {
    type Err = Error;

    /// Parse `j`, `esc`, `up`, `ctrl+k`, `meta+k`, ...
    fn from_str(s: &str) -> Result<Self> {
        let mut modifiers = Modifiers::NONE;
        let mut parts: Vec<&str> = s.split('+').collect();
        // "ctrl++" style is not supported; a lone "+" is the plus key
        let key_part = if s == "+" {
            parts.clear();
            "+"
        } else {
            parts
                .pop()
                .filter(|part| !part.is_empty())
                .ok_or_else(|| Error::InvalidInput(format!("empty key: {s:?}")))?
        };

        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                other => {
                    return Err(Error::InvalidInput(format!("unknown modifier: {other}")));
                }
            }
        }

        let key = match key_part.to_ascii_lowercase().as_str() {
            "esc" | "escape" => Key::Escape,
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "space" => Key::Char(' '),
            _ => {
                let mut chars = key_part.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(Error::InvalidInput(format!("unknown key: {key_part}"))),
                }
            }
        };

        Ok(Self { key, modifiers })
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.meta {
            f.write_str("meta+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::ArrowUp => f.write_str("up"),
            Key::ArrowDown => f.write_str("down"),
            Key::Escape => f.write_str("esc"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
        }
    }
}

/// Where keyboard focus was when the key arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusTarget {
    /// A text input, text area, select or content-editable element
    TextInput,
    /// Anything else
    Other,
}

/// Sidebar action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Navigate(Direction),
    TogglePin,
    Delete,
    FocusSearch,
    OpenCommandPalette,
}

/// How a binding treats the platform modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierRule {
    /// Match regardless of modifiers
    Any,
    /// Match only when neither Cmd nor Ctrl is held
    WithoutPlatform,
    /// Match only when Cmd or Ctrl is held
    WithPlatform,
}

impl ModifierRule {
    const fn accepts(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Any => true,
            Self::WithoutPlatform => !modifiers.platform(),
            Self::WithPlatform => modifiers.platform(),
        }
    }
}

/// One row of the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: Key,
    pub rule: ModifierRule,
    pub command: Command,
}

/// Effects the UI shell must apply for one key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Suppress the browser/terminal default for this key
    pub prevent_default: bool,
    /// Remove focus from the currently focused element
    pub blur: bool,
    /// Move focus into the search input after blurring
    pub focus_search: bool,
    /// Sidebar action to run, if any
    pub command: Option<Command>,
}

impl KeyOutcome {
    /// Key was not handled
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            prevent_default: false,
            blur: false,
            focus_search: false,
            command: None,
        }
    }

    /// Whether the key did anything at all
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        self.prevent_default || self.blur || self.focus_search || self.command.is_some()
    }
}

/// Command table keyed by key combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<Binding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        use Command::{Delete, FocusSearch, Navigate, OpenCommandPalette, TogglePin};
        use ModifierRule::{Any, WithPlatform, WithoutPlatform};

        let bindings = [
            (Key::Char('j'), Any, Navigate(Direction::Down)),
            (Key::ArrowDown, Any, Navigate(Direction::Down)),
            (Key::Char('k'), WithoutPlatform, Navigate(Direction::Up)),
            (Key::ArrowUp, Any, Navigate(Direction::Up)),
            (Key::Char('p'), WithoutPlatform, TogglePin),
            (Key::Char('d'), WithoutPlatform, Delete),
            (Key::Char('/'), Any, FocusSearch),
            (Key::Char('k'), WithPlatform, OpenCommandPalette),
        ];

        Self {
            bindings: bindings
                .into_iter()
                .map(|(key, rule, command)| Binding { key, rule, command })
                .collect(),
        }
    }
}

impl KeyMap {
    /// Table with no bindings
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a binding that takes precedence over existing ones
    pub fn bind(&mut self, key: Key, rule: ModifierRule, command: Command) {
        self.bindings.insert(0, Binding { key, rule, command });
    }

    /// Remove every binding for `key`
    pub fn unbind(&mut self, key: Key) {
        self.bindings.retain(|binding| binding.key != key);
    }

    /// All bindings, highest precedence first
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Command bound to a key press, if any
    #[must_use]
    pub fn resolve(&self, input: &KeyInput) -> Option<Command> {
        self.bindings
            .iter()
            .find(|binding| binding.key == input.key && binding.rule.accepts(input.modifiers))
            .map(|binding| binding.command)
    }

    /// Decide what a key press does given where focus is.
    ///
    /// While typing only Escape is handled, and it only blurs. Otherwise a
    /// bound key always prevents the default and blurs before its command.
    #[must_use]
    pub fn dispatch(&self, input: &KeyInput, target: FocusTarget) -> KeyOutcome {
        match target {
            FocusTarget::TextInput => {
                if input.key == Key::Escape {
                    KeyOutcome {
                        blur: true,
                        ..KeyOutcome::ignored()
                    }
                } else {
                    KeyOutcome::ignored()
                }
            }
            FocusTarget::Other => self.resolve(input).map_or_else(KeyOutcome::ignored, |command| {
                KeyOutcome {
                    prevent_default: true,
                    blur: true,
                    focus_search: command == Command::FocusSearch,
                    command: Some(command),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> KeyInput {
        s.parse().unwrap()
    }

    fn command(s: &str) -> Option<Command> {
        KeyMap::default().dispatch(&key(s), FocusTarget::Other).command
    }

    #[test]
    fn parses_keys_and_modifiers() {
        assert_eq!(key("j"), KeyInput::char('j'));
        assert_eq!(key("esc"), KeyInput::plain(Key::Escape));
        assert_eq!(key("ArrowDown"), KeyInput::plain(Key::ArrowDown));
        assert_eq!(
            key("ctrl+k"),
            KeyInput::char('k').with_modifiers(Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            })
        );
        assert_eq!(key("/"), KeyInput::char('/'));
        assert!("hyper+k".parse::<KeyInput>().is_err());
        assert!("jk".parse::<KeyInput>().is_err());
        assert!("".parse::<KeyInput>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for raw in ["j", "up", "esc", "ctrl+k", "meta+shift+p"] {
            assert_eq!(key(raw).to_string(), raw);
        }
    }

    #[test]
    fn default_table_matches_shortcuts() {
        assert_eq!(command("j"), Some(Command::Navigate(Direction::Down)));
        assert_eq!(command("down"), Some(Command::Navigate(Direction::Down)));
        assert_eq!(command("k"), Some(Command::Navigate(Direction::Up)));
        assert_eq!(command("up"), Some(Command::Navigate(Direction::Up)));
        assert_eq!(command("p"), Some(Command::TogglePin));
        assert_eq!(command("d"), Some(Command::Delete));
        assert_eq!(command("/"), Some(Command::FocusSearch));
        assert_eq!(command("meta+k"), Some(Command::OpenCommandPalette));
        assert_eq!(command("ctrl+k"), Some(Command::OpenCommandPalette));
    }

    #[test]
    fn platform_modifier_disables_single_letter_actions() {
        assert_eq!(command("meta+p"), None);
        assert_eq!(command("ctrl+d"), None);
        assert_eq!(command("x"), None);
    }

    #[test]
    fn command_state_prevents_default_and_blurs() {
        let outcome = KeyMap::default().dispatch(&key("j"), FocusTarget::Other);
        assert_eq!(
            outcome,
            KeyOutcome {
                prevent_default: true,
                blur: true,
                focus_search: false,
                command: Some(Command::Navigate(Direction::Down)),
            }
        );

        let slash = KeyMap::default().dispatch(&key("/"), FocusTarget::Other);
        assert!(slash.focus_search);
        assert!(slash.blur);

        let unbound = KeyMap::default().dispatch(&key("x"), FocusTarget::Other);
        assert!(!unbound.is_handled());
    }

    #[test]
    fn typing_state_only_handles_escape() {
        let map = KeyMap::default();
        let escape = map.dispatch(&key("esc"), FocusTarget::TextInput);
        assert_eq!(
            escape,
            KeyOutcome {
                prevent_default: false,
                blur: true,
                focus_search: false,
                command: None,
            }
        );

        for raw in ["j", "k", "d", "p", "/", "ctrl+k", "down"] {
            assert!(!map.dispatch(&key(raw), FocusTarget::TextInput).is_handled(), "{raw}");
        }
    }

    #[test]
    fn escape_in_command_state_is_ignored() {
        assert!(!KeyMap::default()
            .dispatch(&key("esc"), FocusTarget::Other)
            .is_handled());
    }

    #[test]
    fn custom_bindings_take_precedence() {
        let mut map = KeyMap::default();
        map.bind(Key::Char('d'), ModifierRule::Any, Command::TogglePin);
        assert_eq!(map.resolve(&key("d")), Some(Command::TogglePin));

        map.unbind(Key::Char('d'));
        assert_eq!(map.resolve(&key("d")), None);
        assert!(KeyMap::empty().bindings().is_empty());
    }
}
