use std::collections::HashSet;

use glam::Vec2;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the current state and records transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(pos) => self.pointer_pos = Some(*pos),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, repeat } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) && !*repeat {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton { button, state, pos } => {
                self.pointer_pos = Some(*pos);
                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                            if *button == MouseButton::Left {
                                frame.clicks.push(*pos);
                            }
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton { button, state: ButtonState::Pressed, pos: Vec2::new(x, y) }
    }

    fn release(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton { button, state: ButtonState::Released, pos: Vec2::new(x, y) }
    }

    #[test]
    fn left_press_records_click_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, 12.0, 34.0));

        assert_eq!(frame.clicks, vec![Vec2::new(12.0, 34.0)]);
        assert!(state.button_down(MouseButton::Left));
        assert_eq!(state.pointer_pos, Some(Vec2::new(12.0, 34.0)));
    }

    #[test]
    fn right_press_is_not_a_click() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Right, 1.0, 1.0));
        state.apply_event(&mut frame, release(MouseButton::Right, 1.0, 1.0));

        assert!(frame.clicks.is_empty());
        assert!(frame.buttons_released.contains(&MouseButton::Right));
    }

    #[test]
    fn key_repeat_does_not_count_as_new_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Key { key: Key::C, state: ButtonState::Pressed, repeat: false });
        frame.clear();
        state.apply_event(&mut frame, InputEvent::Key { key: Key::C, state: ButtonState::Pressed, repeat: true });

        assert!(!frame.key_pressed(Key::C));
        assert!(state.key_down(Key::C));
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Key { key: Key::Space, state: ButtonState::Pressed, repeat: false });
        state.apply_event(&mut frame, press(MouseButton::Left, 0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::Space));
        assert!(!state.button_down(MouseButton::Left));
    }
}
