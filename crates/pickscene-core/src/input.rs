//! Per-frame input snapshot.
//!
//! The window layer translates raw key and button events into [`Action`]s and
//! feeds them here. Everything downstream (camera, selection) reads the
//! snapshot instead of reacting to events, so "just pressed" means "pressed
//! since the previous [`InputState::end_frame`]".

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A logical input the application reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Pick the object under the aim point.
    Select,
    /// Drop the held object.
    Deselect,
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    /// Movement speed modifier.
    SlowMove,
    /// Movement speed modifier.
    FastMove,
    /// Close the application.
    Quit,
}

/// Which actions are held now and which went down since the last frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: HashSet<Action>,
    /// Kept until `end_frame` even if the action is released again, so a
    /// press and release between two frames still counts as a press.
    pressed_this_frame: HashSet<Action>,
    look_delta: Vec2,
}

impl InputState {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an action as held.
    pub fn press(&mut self, action: Action) {
        if self.current.insert(action) {
            self.pressed_this_frame.insert(action);
        }
    }

    /// Marks an action as released.
    pub fn release(&mut self, action: Action) {
        self.current.remove(&action);
    }

    /// Returns true while the action is held.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.current.contains(&action)
    }

    /// Returns true if the action went down during this frame, even if it
    /// has been released since.
    pub fn just_pressed(&self, action: Action) -> bool {
        self.pressed_this_frame.contains(&action)
    }

    /// Accumulates raw mouse motion.
    pub fn add_look_delta(&mut self, delta: Vec2) {
        self.look_delta += delta;
    }

    /// Returns and clears the accumulated mouse motion.
    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    /// Forgets this frame's presses. Call once per frame, after everything
    /// has read the snapshot.
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_lasts_one_frame() {
        let mut input = InputState::new();
        input.press(Action::Select);
        assert!(input.just_pressed(Action::Select));
        assert!(input.is_pressed(Action::Select));

        input.end_frame();
        assert!(!input.just_pressed(Action::Select));
        assert!(input.is_pressed(Action::Select));

        input.release(Action::Select);
        input.end_frame();
        input.press(Action::Select);
        assert!(input.just_pressed(Action::Select));
    }

    #[test]
    fn test_press_and_release_within_frame() {
        let mut input = InputState::new();
        input.press(Action::Deselect);
        input.release(Action::Deselect);
        assert!(input.just_pressed(Action::Deselect));
        assert!(!input.is_pressed(Action::Deselect));

        input.end_frame();
        assert!(!input.just_pressed(Action::Deselect));
    }

    #[test]
    fn test_repeated_press_while_held_is_not_new() {
        let mut input = InputState::new();
        input.press(Action::Select);
        input.end_frame();
        input.press(Action::Select);
        assert!(!input.just_pressed(Action::Select));
    }

    #[test]
    fn test_look_delta_accumulates() {
        let mut input = InputState::new();
        input.add_look_delta(Vec2::new(1.0, 2.0));
        input.add_look_delta(Vec2::new(0.5, -1.0));
        assert_eq!(input.take_look_delta(), Vec2::new(1.5, 1.0));
        assert_eq!(input.take_look_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_action_serde_names() {
        let json = serde_json::to_string(&Action::MoveForward).unwrap();
        assert_eq!(json, "\"move_forward\"");
    }
}
