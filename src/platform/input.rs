//! Keyboard and pointer state

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Current held-key set, pointer and fire button
///
/// Key names follow the DOM `KeyboardEvent.key` values, compared
/// case-insensitively ("w", "ArrowUp", " ", "Escape").
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    pointer: Vec2,
    fire: bool,
    /// Escape pressed since the last frame
    pause_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        let key = key.to_lowercase();
        // Pause is edge-triggered; ignore key repeat
        if key == "escape" && !self.held.contains(&key) {
            self.pause_pressed = true;
        }
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Pointer position in playfield coordinates
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn set_fire(&mut self, held: bool) {
        self.fire = held;
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.held.clear();
        self.fire = false;
        self.pause_pressed = false;
    }

    fn is_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// Snapshot for this frame. Clears the one-shot pause edge.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            up: self.is_held(&["w", "arrowup"]),
            down: self.is_held(&["s", "arrowdown"]),
            left: self.is_held(&["a", "arrowleft"]),
            right: self.is_held(&["d", "arrowright"]),
            fire: self.fire,
            reload: self.is_held(&["r"]),
            gadget: self.is_held(&[" "]),
            pause: self.pause_pressed,
            pointer: self.pointer,
        };
        self.pause_pressed = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let mut input = InputState::new();
        input.key_down("W");
        input.key_down("ArrowLeft");
        let t = input.take_tick_input();
        assert!(t.up && t.left);
        assert!(!t.down && !t.right);

        input.key_up("w");
        assert!(!input.take_tick_input().up);
    }

    #[test]
    fn test_actions() {
        let mut input = InputState::new();
        input.key_down("r");
        input.key_down(" ");
        input.set_fire(true);
        input.set_pointer(Vec2::new(10.0, 20.0));
        let t = input.take_tick_input();
        assert!(t.reload && t.gadget && t.fire);
        assert_eq!(t.pointer, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.take_tick_input().pause);
        assert!(!input.take_tick_input().pause);

        // Key repeat while held doesn't toggle again
        input.key_down("Escape");
        assert!(!input.take_tick_input().pause);

        input.key_up("Escape");
        input.key_down("Escape");
        assert!(input.take_tick_input().pause);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputState::new();
        input.key_down("d");
        input.set_fire(true);
        input.clear();
        let t = input.take_tick_input();
        assert!(!t.right && !t.fire);
    }
}
