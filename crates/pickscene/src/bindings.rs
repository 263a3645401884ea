//! Mapping from physical keys and mouse buttons to [`Action`]s.

use std::collections::HashMap;

use pickscene_core::Action;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Key and mouse button bindings.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: HashMap<KeyCode, Action>,
    buttons: HashMap<MouseButton, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = HashMap::from([
            (KeyCode::KeyW, Action::MoveForward),
            (KeyCode::KeyS, Action::MoveBackward),
            (KeyCode::KeyA, Action::MoveLeft),
            (KeyCode::KeyD, Action::MoveRight),
            (KeyCode::ControlLeft, Action::SlowMove),
            (KeyCode::ShiftLeft, Action::FastMove),
            (KeyCode::Escape, Action::Quit),
        ]);
        let buttons = HashMap::from([
            (MouseButton::Left, Action::Select),
            (MouseButton::Right, Action::Deselect),
        ]);
        Self { keys, buttons }
    }
}

impl KeyBindings {
    /// Bindings with nothing bound.
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            buttons: HashMap::new(),
        }
    }

    /// Binds `key` to `action`, replacing any previous binding of that key.
    pub fn bind_key(&mut self, key: KeyCode, action: Action) {
        self.keys.insert(key, action);
    }

    /// Binds `button` to `action`, replacing any previous binding of that button.
    pub fn bind_button(&mut self, button: MouseButton, action: Action) {
        self.buttons.insert(button, action);
    }

    pub fn action_for_key(&self, key: KeyCode) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    pub fn action_for_button(&self, button: MouseButton) -> Option<Action> {
        self.buttons.get(&button).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for_key(KeyCode::KeyW), Some(Action::MoveForward));
        assert_eq!(bindings.action_for_key(KeyCode::KeyA), Some(Action::MoveLeft));
        assert_eq!(bindings.action_for_key(KeyCode::ControlLeft), Some(Action::SlowMove));
        assert_eq!(bindings.action_for_key(KeyCode::ShiftLeft), Some(Action::FastMove));
        assert_eq!(bindings.action_for_key(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(bindings.action_for_button(MouseButton::Left), Some(Action::Select));
        assert_eq!(bindings.action_for_button(MouseButton::Right), Some(Action::Deselect));
        assert_eq!(bindings.action_for_key(KeyCode::KeyQ), None);
        assert_eq!(bindings.action_for_button(MouseButton::Middle), None);
    }

    #[test]
    fn test_rebind() {
        let mut bindings = KeyBindings::empty();
        bindings.bind_key(KeyCode::KeyQ, Action::Quit);
        bindings.bind_button(MouseButton::Middle, Action::Select);
        assert_eq!(bindings.action_for_key(KeyCode::KeyQ), Some(Action::Quit));
        assert_eq!(bindings.action_for_button(MouseButton::Middle), Some(Action::Select));
        assert_eq!(bindings.action_for_key(KeyCode::KeyW), None);
    }
}
