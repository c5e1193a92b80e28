use crate::bufed::action::BufedAction;
use crate::config::{Config, Keybinding};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Default buffer list bindings: (key, modifiers, action name)
const DEFAULT_BINDINGS: &[(&str, &[&str], &str)] = &[
    ("Enter", &[], "bufed-select"),
    ("Space", &[], "bufed-select"),
    ("e", &[], "bufed-select"),
    ("q", &[], "bufed-select"),
    ("g", &["ctrl"], "bufed-abort"),
    ("Esc", &[], "bufed-abort"),
    ("~", &[], "bufed-clear-modified"),
    ("%", &[], "bufed-toggle-read-only"),
    ("a", &[], "bufed-toggle-all-visible"),
    (".", &[], "bufed-toggle-all-visible"),
    ("r", &[], "bufed-refresh"),
    ("g", &[], "bufed-refresh"),
    ("k", &[], "bufed-kill-buffer"),
    ("d", &[], "bufed-kill-buffer"),
    ("Delete", &[], "bufed-kill-buffer"),
    ("Backspace", &[], "bufed-kill-buffer"),
    ("u", &[], "bufed-unsorted"),
    ("b", &[], "bufed-sort-name"),
    ("B", &[], "bufed-sort-name"),
    ("f", &[], "bufed-sort-filename"),
    ("F", &[], "bufed-sort-filename"),
    ("z", &[], "bufed-sort-size"),
    ("Z", &[], "bufed-sort-size"),
    ("t", &[], "bufed-sort-time"),
    ("T", &[], "bufed-sort-time"),
    ("m", &[], "bufed-sort-modified"),
    ("M", &[], "bufed-sort-modified"),
    ("x", &[], "bufed-toggle-mark"),
    ("Insert", &[], "bufed-toggle-mark"),
    ("U", &[], "bufed-unmark-all"),
    ("n", &[], "next-line"),
    ("Down", &[], "next-line"),
    ("p", &[], "previous-line"),
    ("Up", &[], "previous-line"),
    ("PageDown", &[], "scroll-up"),
    ("PageUp", &[], "scroll-down"),
    ("Home", &[], "beginning-of-buffer"),
    ("End", &[], "end-of-buffer"),
    ("?", &[], "bufed-help"),
];

/// Format a key combination for help output, e.g. "Ctrl+G"
pub fn format_keybinding(keycode: &KeyCode, modifiers: &KeyModifiers) -> String {
    let mut result = String::new();

    if modifiers.contains(KeyModifiers::CONTROL) {
        result.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        result.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        result.push_str("Shift+");
    }

    match keycode {
        KeyCode::Enter => result.push_str("Enter"),
        KeyCode::Backspace => result.push_str("Backspace"),
        KeyCode::Delete => result.push_str("Del"),
        KeyCode::Insert => result.push_str("Ins"),
        KeyCode::Esc => result.push_str("Esc"),
        KeyCode::Up => result.push_str("↑"),
        KeyCode::Down => result.push_str("↓"),
        KeyCode::Home => result.push_str("Home"),
        KeyCode::End => result.push_str("End"),
        KeyCode::PageUp => result.push_str("PgUp"),
        KeyCode::PageDown => result.push_str("PgDn"),
        KeyCode::Char(' ') => result.push_str("Space"),
        // Case is significant: "b" and "B" are different bindings
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
            result.push_str(&c.to_uppercase().to_string())
        }
        KeyCode::Char(c) => result.push(*c),
        KeyCode::F(n) => result.push_str(&format!("F{}", n)),
        _ => return String::new(),
    }

    result
}

/// Resolves key events to buffer list actions
#[derive(Debug, Clone)]
pub struct Keymap {
    /// Bindings from the configuration file; checked first
    bindings: HashMap<(KeyCode, KeyModifiers), BufedAction>,
    default_bindings: HashMap<(KeyCode, KeyModifiers), BufedAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Keymap {
    /// Create a keymap from the defaults plus the configured overrides
    pub fn new(config: &Config) -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
            default_bindings: HashMap::new(),
        };

        let no_args = HashMap::new();
        for (key, modifiers, action) in DEFAULT_BINDINGS {
            let code = Self::parse_key(key);
            let action = BufedAction::from_name(action, &no_args);
            if let (Some(code), Some(action)) = (code, action) {
                let modifiers: Vec<String> = modifiers.iter().map(|m| m.to_string()).collect();
                keymap
                    .default_bindings
                    .insert((code, Self::parse_modifiers(&modifiers)), action);
            }
        }

        keymap.load_bindings_from_vec(&config.keybindings);
        keymap
    }

    /// Load custom bindings; entries with an unknown key or action are
    /// skipped with a warning
    fn load_bindings_from_vec(&mut self, bindings: &[Keybinding]) {
        for binding in bindings {
            let Some(action) = BufedAction::from_name(&binding.action, &binding.args) else {
                tracing::warn!(
                    "Ignoring keybinding for '{}': unknown action '{}'",
                    binding.key,
                    binding.action
                );
                continue;
            };
            let Some(code) = Self::parse_key(&binding.key) else {
                tracing::warn!(
                    "Ignoring keybinding for action '{}': unknown key '{}'",
                    binding.action,
                    binding.key
                );
                continue;
            };
            let modifiers = Self::parse_modifiers(&binding.modifiers);
            tracing::debug!("Custom keybinding {:?}+{:?} -> {}", modifiers, code, action.name());
            self.bindings.insert((code, modifiers), action);
        }
    }

    /// Resolve a key event to an action
    pub fn resolve(&self, event: &KeyEvent) -> Option<BufedAction> {
        let key = Self::normalize(event);
        tracing::trace!("Keymap.resolve: code={:?}, modifiers={:?}", key.0, key.1);

        self.bindings
            .get(&key)
            .or_else(|| self.default_bindings.get(&key))
            .copied()
    }

    /// Terminals report shifted characters both with and without SHIFT;
    /// the character itself already carries the case
    fn normalize(event: &KeyEvent) -> (KeyCode, KeyModifiers) {
        match event.code {
            KeyCode::Char(_) => (event.code, event.modifiers - KeyModifiers::SHIFT),
            code => (code, event.modifiers),
        }
    }

    /// Parse a key string to KeyCode
    ///
    /// Single characters keep their case; named keys are case-insensitive.
    fn parse_key(key: &str) -> Option<KeyCode> {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c));
        }

        let lower = key.to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(KeyCode::Enter),
            "backspace" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "insert" | "ins" => Some(KeyCode::Insert),
            "esc" | "escape" => Some(KeyCode::Esc),
            "space" => Some(KeyCode::Char(' ')),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            "pageup" => Some(KeyCode::PageUp),
            "pagedown" => Some(KeyCode::PageDown),
            s if s.starts_with('f') && s.len() >= 2 => s[1..].parse::<u8>().ok().map(KeyCode::F),
            _ => None,
        }
    }

    /// Parse modifiers from strings
    fn parse_modifiers(modifiers: &[String]) -> KeyModifiers {
        let mut result = KeyModifiers::empty();
        for m in modifiers {
            match m.to_lowercase().as_str() {
                "ctrl" | "control" => result |= KeyModifiers::CONTROL,
                "shift" => result |= KeyModifiers::SHIFT,
                "alt" | "meta" => result |= KeyModifiers::ALT,
                _ => {}
            }
        }
        result
    }

    /// All effective bindings as (key description, action description),
    /// ordered by action
    pub fn get_all_bindings(&self) -> Vec<(String, String)> {
        let mut all_keys = self.default_bindings.clone();
        all_keys.extend(self.bindings.iter().map(|(k, a)| (*k, *a)));

        let mut bindings: Vec<(usize, String, String)> = all_keys
            .into_iter()
            .map(|((code, modifiers), action)| {
                let order = BufedAction::ALL
                    .iter()
                    .position(|a| a.name() == action.name())
                    .unwrap_or(usize::MAX);
                (
                    order,
                    format_keybinding(&code, &modifiers),
                    action.description().to_string(),
                )
            })
            .collect();
        bindings.sort();

        bindings
            .into_iter()
            .map(|(_, key, description)| (key, description))
            .collect()
    }
}
