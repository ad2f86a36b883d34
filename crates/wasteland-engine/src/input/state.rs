use std::collections::HashSet;

use glam::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current input state for the window.
///
/// Holds "is down" information. Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl Default for InputState {
    /// A window that was just opened is treated as focused until the
    /// platform reports otherwise.
    fn default() -> Self {
        Self { modifiers: Modifiers::default(), focused: true, keys_down: HashSet::new() }
    }
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck movement keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, modifiers, repeat } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                            frame.keys_typed.push(*key);
                        } else if *repeat {
                            frame.keys_typed.push(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::MouseMotion { dx, dy } => {
                frame.mouse_delta += Vec2::new(*dx, *dy);
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                frame.scroll_lines += delta.lines_y();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_then_release_is_tracked() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, KeyState::Pressed, false));
        assert!(state.key_down(Key::W));
        assert!(frame.pressed(Key::W));

        frame.clear();
        state.apply_event(&mut frame, key(Key::W, KeyState::Released, false));
        assert!(!state.key_down(Key::W));
        assert!(frame.keys_released.contains(&Key::W));
        assert!(!frame.pressed(Key::W));
    }

    #[test]
    fn repeats_are_typed_but_not_pressed_again() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed, true));
        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed, true));

        assert!(!frame.pressed(Key::ArrowLeft));
        assert_eq!(frame.keys_typed, vec![Key::ArrowLeft, Key::ArrowLeft]);
    }

    #[test]
    fn new_state_is_focused_until_told_otherwise() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        assert!(state.focused);
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused);
        state.apply_event(&mut frame, InputEvent::Focused(true));
        assert!(state.focused);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::D, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.key_down(Key::D));
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn motion_and_scroll_accumulate_until_clear() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: 2.0, dy: -1.0 });
        state.apply_event(&mut frame, InputEvent::MouseMotion { dx: 3.0, dy: 4.0 });
        let wheel = MouseWheelDelta::Line { x: 0.0, y: 1.5 };
        state.apply_event(&mut frame, InputEvent::MouseWheel { delta: wheel, modifiers: Modifiers::default() });

        assert_eq!(frame.mouse_delta, Vec2::new(5.0, 3.0));
        assert_eq!(frame.scroll_lines, 1.5);
        assert_eq!(frame.events.len(), 3);

        frame.clear();
        assert_eq!(frame.mouse_delta, Vec2::ZERO);
        assert_eq!(frame.scroll_lines, 0.0);
    }
}
