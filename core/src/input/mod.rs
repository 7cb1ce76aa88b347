//! Input unification for keyboard and controller
//!
//! Each physical device is a [`RawInputSource`] producing a debounced
//! [`ButtonState`] per logical button. The [`InputUnifier`] folds every
//! source with `max` into the canonical vector games read.

mod controller;
#[cfg(feature = "gamepad")]
mod gamepad;
mod keyboard;
mod keyboard_mapping;
pub(crate) mod keycode_serde;

#[cfg(test)]
mod tests;

pub use controller::{ControllerSource, GamepadSnapshot};
#[cfg(feature = "gamepad")]
pub use gamepad::GamepadPoller;
pub use keyboard::KeyboardSource;
pub use keyboard_mapping::KeyboardMapping;

use serde::{Deserialize, Serialize};

use crate::console::{Button, ButtonState};

/// A device that reports one debounced signal per logical button
pub trait RawInputSource {
    fn poll_button(&self, button: Button) -> ButtonState;
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Keyboard bindings for the logical buttons
    #[serde(default)]
    pub keyboard: KeyboardMapping,
    /// Analog stick deadzone as a fraction of full deflection
    #[serde(default = "default_stick_deadzone")]
    pub stick_deadzone: f32,
}

fn default_stick_deadzone() -> f32 {
    13000.0 / 32767.0
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keyboard: KeyboardMapping::default(),
            stick_deadzone: default_stick_deadzone(),
        }
    }
}

/// Canonical per-tick button vector exposed to the game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputUnifier {
    buttons: [ButtonState; Button::COUNT],
}

impl InputUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every button as the maximum over all sources
    pub fn merge(&mut self, sources: &[&dyn RawInputSource]) {
        for button in Button::ALL {
            self.buttons[button.index()] = sources
                .iter()
                .map(|source| source.poll_button(button))
                .max()
                .unwrap_or_default();
        }
    }

    pub fn state(&self, button: Button) -> ButtonState {
        self.buttons[button.index()]
    }

    /// Script-facing lookup; unknown ids read as released
    pub fn query(&self, id: i32) -> ButtonState {
        Button::from_id(id)
            .map(|button| self.state(button))
            .unwrap_or_default()
    }
}
