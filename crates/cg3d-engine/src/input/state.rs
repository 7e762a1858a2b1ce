use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Last pointer position in logical pixels; `None` once the pointer left.
    pub pointer_pos: Option<(f32, f32)>,

    /// Currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event. Returns `true` when `key` went from up to down, so
    /// the caller can react to presses without tracking repeats itself.
    pub fn apply_event(&mut self, ev: &InputEvent) -> bool {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
                false
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
                false
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
                false
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => self.keys_down.insert(*key),
                KeyState::Released => {
                    self.keys_down.remove(key);
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn pointer_tracks_moves_and_leave() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 3.0, y: 4.0 }));
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn press_reports_only_first_transition() {
        let mut s = InputState::default();
        assert!(s.apply_event(&key(Key::Escape, KeyState::Pressed)));
        assert!(!s.apply_event(&key(Key::Escape, KeyState::Pressed)));
        assert!(s.keys_down.contains(&Key::Escape));
        assert!(!s.apply_event(&key(Key::Escape, KeyState::Released)));
        assert!(s.keys_down.is_empty());
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::Focused(true));
        s.apply_event(&key(Key::Space, KeyState::Pressed));
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.focused);
        assert!(s.keys_down.is_empty());
    }
}
