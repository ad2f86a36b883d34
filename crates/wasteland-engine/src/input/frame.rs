use std::collections::HashSet;

use glam::Vec2;

use super::types::{InputEvent, Key};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys, focus).
/// `InputFrame` provides events and transitions for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,

    /// Presses and auto-repeats, in arrival order.
    pub keys_typed: Vec<Key>,

    /// Accumulated raw mouse motion (+Y down).
    pub mouse_delta: Vec2,

    /// Accumulated vertical scroll in lines.
    pub scroll_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.keys_typed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_lines = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    #[inline]
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
