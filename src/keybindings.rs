use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NextTarget,
    PrevTarget,
    ToggleSplit,
    OpenSupport,
    OpenSettings,
    CloseOverlay,
    // settings menu navigation
    MenuUp,
    MenuDown,
    ToggleSelection,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::NextTarget => "Next target",
            Action::PrevTarget => "Previous target",
            Action::ToggleSplit => "Toggle split pane",
            Action::OpenSupport => "Open support overlay",
            Action::OpenSettings => "Open settings",
            Action::CloseOverlay => "Close overlay",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::ToggleSelection => "Toggle selection",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(
            NextTarget,
            KeyCombo::new(KeyCode::Char(']'), KeyModifiers::ALT),
        );
        kb.add(
            PrevTarget,
            KeyCombo::new(KeyCode::Char('['), KeyModifiers::ALT),
        );
        kb.add(
            ToggleSplit,
            KeyCombo::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        kb.add(OpenSupport, KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE));
        kb.add(
            OpenSettings,
            KeyCombo::new(KeyCode::F(2), KeyModifiers::NONE),
        );
        kb.add(CloseOverlay, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(MenuUp, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(
            MenuUp,
            KeyCombo::new(KeyCode::Char('k'), KeyModifiers::NONE),
        );
        kb.add(MenuDown, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(
            MenuDown,
            KeyCombo::new(KeyCode::Char('j'), KeyModifiers::NONE),
        );
        kb.add(
            ToggleSelection,
            KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE),
        );
        kb.add(
            ToggleSelection,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|combos| combos.iter().any(|combo| combo.matches(key)))
    }

    pub fn combos(&self, action: Action) -> &[KeyCombo] {
        self.map
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
