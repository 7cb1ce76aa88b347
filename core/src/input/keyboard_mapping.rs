//! Keyboard to logical button mapping

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use super::keycode_serde::{deserialize_keycodes, serialize_keycodes};
use crate::console::Button;

/// Keys bound to each logical button; several keys may share a button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardMapping {
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub up: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub down: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub left: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub right: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub b: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub a: Vec<KeyCode>,
    #[serde(serialize_with = "serialize_keycodes", deserialize_with = "deserialize_keycodes")]
    pub start: Vec<KeyCode>,
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        Self {
            up: vec![KeyCode::ArrowUp],
            down: vec![KeyCode::ArrowDown],
            left: vec![KeyCode::ArrowLeft],
            right: vec![KeyCode::ArrowRight],
            b: vec![
                KeyCode::KeyX,
                KeyCode::KeyA,
                KeyCode::KeyW,
                KeyCode::Digit1,
            ],
            a: vec![
                KeyCode::KeyZ,
                KeyCode::KeyS,
                KeyCode::KeyQ,
                KeyCode::Digit2,
            ],
            start: vec![KeyCode::Enter, KeyCode::NumpadEnter],
        }
    }
}

impl KeyboardMapping {
    pub fn keys(&self, button: Button) -> &[KeyCode] {
        match button {
            Button::Up => &self.up,
            Button::Down => &self.down,
            Button::Left => &self.left,
            Button::Right => &self.right,
            Button::B => &self.b,
            Button::A => &self.a,
            Button::Start => &self.start,
        }
    }

    /// Logical button bound to a key, if any
    pub fn button_for(&self, key: KeyCode) -> Option<Button> {
        Button::ALL
            .into_iter()
            .find(|button| self.keys(*button).contains(&key))
    }
}
