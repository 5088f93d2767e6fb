//! Keyboard layout + KeyboardInput
//!
//! Logical direction (не зависит от рендера):
//! - `x`: -1.0 (left) → +1.0 (right)
//! - `y`: -1.0 (forward) → +1.0 (backward)
//!
//! Противоположные клавиши гасят друг друга, диагональ нормализуется.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::Deserialize;

use super::source::{Action, InputSource};

/// Persisted layout preference ("qwerty" / "azerty")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    /// WASD
    #[default]
    Qwerty,
    /// ZQSD
    Azerty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyboard layout '{0}' (expected 'qwerty' or 'azerty')")]
pub struct UnknownLayout(pub String);

impl FromStr for KeyboardLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qwerty" => Ok(KeyboardLayout::Qwerty),
            "azerty" => Ok(KeyboardLayout::Azerty),
            _ => Err(UnknownLayout(s.to_string())),
        }
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyboardLayout::Qwerty => "qwerty",
            KeyboardLayout::Azerty => "azerty",
        })
    }
}

/// Клавиша после раскладки (символ, который видит пользователь)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
}

impl LogicalKey {
    /// Символы без учёта регистра
    pub fn normalized(self) -> Self {
        match self {
            LogicalKey::Char(c) => LogicalKey::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl KeyboardLayout {
    /// Стрелки работают в любой раскладке
    pub fn move_key(&self, key: LogicalKey) -> Option<MoveKey> {
        match key.normalized() {
            LogicalKey::ArrowUp => Some(MoveKey::Forward),
            LogicalKey::ArrowDown => Some(MoveKey::Backward),
            LogicalKey::ArrowLeft => Some(MoveKey::Left),
            LogicalKey::ArrowRight => Some(MoveKey::Right),
            LogicalKey::Char(c) => match (self, c) {
                (KeyboardLayout::Qwerty, 'w') | (KeyboardLayout::Azerty, 'z') => Some(MoveKey::Forward),
                (_, 's') => Some(MoveKey::Backward),
                (KeyboardLayout::Qwerty, 'a') | (KeyboardLayout::Azerty, 'q') => Some(MoveKey::Left),
                (_, 'd') => Some(MoveKey::Right),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn action(&self, key: LogicalKey) -> Option<Action> {
        match key.normalized() {
            LogicalKey::Char('e') | LogicalKey::Enter => Some(Action::Interact),
            LogicalKey::Escape => Some(Action::Exit),
            _ => None,
        }
    }
}

/// Keyboard-backed InputSource (press/release приходят от платформы)
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    layout: KeyboardLayout,
    held: HashSet<LogicalKey>,
    just_pressed: HashSet<Action>,
}

impl KeyboardInput {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    /// Смена раскладки сбрасывает зажатые клавиши (иначе "залипшее" движение)
    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.layout = layout;
        self.held.clear();
    }

    /// Auto-repeat (повторный press без release) не даёт второго just_pressed
    pub fn press(&mut self, key: LogicalKey) {
        let key = key.normalized();
        if !self.held.insert(key) {
            return;
        }
        if let Some(action) = self.layout.action(key) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, key: LogicalKey) {
        self.held.remove(&key.normalized());
    }

    fn is_held(&self, wanted: MoveKey) -> bool {
        self.held.iter().any(|k| self.layout.move_key(*k) == Some(wanted))
    }
}

impl InputSource for KeyboardInput {
    fn movement_vector(&self) -> Vec2 {
        let axis = |negative: bool, positive: bool| (positive as i8 - negative as i8) as f32;
        let direction = Vec2::new(
            axis(self.is_held(MoveKey::Left), self.is_held(MoveKey::Right)),
            axis(self.is_held(MoveKey::Forward), self.is_held(MoveKey::Backward)),
        );
        direction.normalize_or_zero()
    }

    fn is_action_just_pressed(&mut self, action: Action) -> bool {
        self.just_pressed.remove(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_parse_and_display() {
        assert_eq!("AZERTY".parse::<KeyboardLayout>(), Ok(KeyboardLayout::Azerty));
        assert_eq!(" qwerty ".parse::<KeyboardLayout>(), Ok(KeyboardLayout::Qwerty));
        assert!("dvorak".parse::<KeyboardLayout>().is_err());
        assert_eq!(KeyboardLayout::Azerty.to_string(), "azerty");
    }

    #[test]
    fn test_qwerty_vs_azerty_forward() {
        let mut qwerty = KeyboardInput::new(KeyboardLayout::Qwerty);
        qwerty.press(LogicalKey::Char('W'));
        assert_eq!(qwerty.movement_vector(), Vec2::new(0.0, -1.0));

        let mut azerty = KeyboardInput::new(KeyboardLayout::Azerty);
        azerty.press(LogicalKey::Char('w'));
        assert_eq!(azerty.movement_vector(), Vec2::ZERO, "W ничего не делает в AZERTY");
        azerty.press(LogicalKey::Char('z'));
        assert_eq!(azerty.movement_vector(), Vec2::new(0.0, -1.0));
        azerty.press(LogicalKey::Char('q'));
        let v = azerty.movement_vector();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.x < 0.0 && v.y < 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = KeyboardInput::new(KeyboardLayout::Qwerty);
        input.press(LogicalKey::Char('w'));
        input.press(LogicalKey::Char('s'));
        assert_eq!(input.movement_vector(), Vec2::ZERO);

        input.press(LogicalKey::ArrowLeft);
        assert_eq!(input.movement_vector(), Vec2::new(-1.0, 0.0));
        input.release(LogicalKey::Char('S'));
        let v = input.movement_vector();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_action_edge_triggered() {
        let mut input = KeyboardInput::new(KeyboardLayout::Qwerty);
        input.press(LogicalKey::Char('e'));

        assert!(input.is_action_just_pressed(Action::Interact));
        assert!(!input.is_action_just_pressed(Action::Interact), "cleared on read");

        // Auto-repeat без release
        input.press(LogicalKey::Char('e'));
        assert!(!input.is_action_just_pressed(Action::Interact));

        input.release(LogicalKey::Char('e'));
        input.press(LogicalKey::Enter);
        input.press(LogicalKey::Escape);
        assert!(input.is_action_just_pressed(Action::Interact));
        assert!(input.is_action_just_pressed(Action::Exit));
    }

    #[test]
    fn test_set_layout_clears_held() {
        let mut input = KeyboardInput::new(KeyboardLayout::Qwerty);
        input.press(LogicalKey::Char('d'));
        input.set_layout(KeyboardLayout::Azerty);
        assert_eq!(input.layout(), KeyboardLayout::Azerty);
        assert_eq!(input.movement_vector(), Vec2::ZERO);
    }
}
