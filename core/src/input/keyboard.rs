//! Edge-driven keyboard source

use crate::console::{Button, ButtonState};

use super::RawInputSource;

/// Keyboard button state fed by press/release events.
///
/// A press reads `JustPressed` for the tick it arrives in and becomes `Held`
/// one latch later; a release clears the button immediately.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSource {
    values: [ButtonState; Button::COUNT],
    latched: [bool; Button::COUNT],
}

impl KeyboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press edge; repeated presses while down are ignored
    pub fn press(&mut self, button: Button) {
        let value = &mut self.values[button.index()];
        if *value == ButtonState::Released {
            *value = ButtonState::JustPressed;
        }
    }

    pub fn release(&mut self, button: Button) {
        self.values[button.index()] = ButtonState::Released;
        self.latched[button.index()] = false;
    }

    /// Advance the one-tick latch, called once per tick after events drain
    pub fn latch(&mut self) {
        for (value, latched) in self.values.iter_mut().zip(self.latched.iter_mut()) {
            if value.is_down() {
                if *latched {
                    *value = ButtonState::Held;
                } else {
                    *latched = true;
                }
            }
        }
    }

    /// Drop all state, e.g. when the window loses focus
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl RawInputSource for KeyboardSource {
    fn poll_button(&self, button: Button) -> ButtonState {
        self.values[button.index()]
    }
}
