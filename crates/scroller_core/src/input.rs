//! Logical input state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(action)` is true every tick the action
//!   is down. Used for movement, crouch and attack.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   tick the transition happened. Cleared by `end_frame()`, which the driver
//!   calls after the simulation tick has consumed them. Jump uses this so that
//!   holding the button does not bounce the hero.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Crouch,
}

impl Action {
    pub const ALL: &'static [Action] = &[
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Attack,
        Action::Crouch,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    just_pressed: HashSet<Action>,
    just_released: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Bring the held set in line with `actions`, generating press/release
    /// edges for whatever changed. Used by scripted input sources that only
    /// know which actions are down each tick.
    pub fn apply_held(&mut self, actions: &[Action]) {
        for &action in Action::ALL {
            if actions.contains(&action) {
                self.press(action);
            } else {
                self.release(action);
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn is_just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Horizontal intent in `{-1, 0, 1}`. Opposing directions cancel.
    pub fn move_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_held(Action::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_held(Action::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.press(Action::Jump);
        assert!(input.is_held(Action::Jump));
        assert!(input.is_just_pressed(Action::Jump));
    }

    #[test]
    fn release_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.press(Action::Attack);
        input.release(Action::Attack);
        assert!(!input.is_held(Action::Attack));
        assert!(input.is_just_released(Action::Attack));
    }

    #[test]
    fn release_without_press_is_no_op() {
        let mut input = InputState::new();
        input.release(Action::Attack);
        assert!(!input.is_just_released(Action::Attack));
    }

    #[test]
    fn end_frame_keeps_held_clears_edges() {
        let mut input = InputState::new();
        input.press(Action::MoveRight);
        input.press(Action::Jump);
        input.end_frame();
        assert!(!input.is_just_pressed(Action::Jump));
        assert!(input.is_held(Action::Jump));
        assert!(input.is_held(Action::MoveRight));
    }

    #[test]
    fn apply_held_generates_edges_only_on_change() {
        let mut input = InputState::new();
        input.apply_held(&[Action::MoveRight, Action::Jump]);
        assert!(input.is_just_pressed(Action::Jump));
        input.end_frame();

        input.apply_held(&[Action::MoveRight, Action::Jump]);
        assert!(!input.is_just_pressed(Action::Jump));
        assert!(input.is_held(Action::Jump));
        input.end_frame();

        input.apply_held(&[Action::MoveRight]);
        assert!(input.is_just_released(Action::Jump));
        assert!(!input.is_held(Action::Jump));
        assert!(input.is_held(Action::MoveRight));
    }

    #[test]
    fn move_axis_cancels_opposites() {
        let mut input = InputState::new();
        assert_eq!(input.move_axis(), 0.0);
        input.press(Action::MoveLeft);
        assert_eq!(input.move_axis(), -1.0);
        input.press(Action::MoveRight);
        assert_eq!(input.move_axis(), 0.0);
        input.release(Action::MoveLeft);
        assert_eq!(input.move_axis(), 1.0);
    }

    #[test]
    fn actions_parse_from_snake_case() {
        let actions: Vec<Action> =
            serde_json::from_str(r#"["move_left", "jump", "attack"]"#).expect("valid json");
        assert_eq!(actions, vec![Action::MoveLeft, Action::Jump, Action::Attack]);
    }
}
