//! Polled controller source

use crate::console::{Button, ButtonState};

use super::RawInputSource;

/// Raw controller readings for one tick.
///
/// Face buttons use positional names (South is Xbox A). Stick axes are in
/// `-1.0..=1.0` with positive Y pointing down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub north: bool,
    pub start: bool,
    pub select: bool,
    pub stick_x: f32,
    pub stick_y: f32,
}

/// Per-input debounce counters for a single controller
#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    dpad_up: ButtonState,
    dpad_down: ButtonState,
    dpad_left: ButtonState,
    dpad_right: ButtonState,
    south: ButtonState,
    east: ButtonState,
    west: ButtonState,
    north: ButtonState,
    start: ButtonState,
    select: ButtonState,
    stick_up: ButtonState,
    stick_down: ButtonState,
    stick_left: ButtonState,
    stick_right: ButtonState,
}

/// Controller button state derived from polling.
///
/// Every input counts up while held and snaps back to released the first
/// tick it is not, including stick directions leaving the deadzone.
#[derive(Debug, Clone)]
pub struct ControllerSource {
    counters: Counters,
    deadzone: f32,
}

impl ControllerSource {
    pub fn new(deadzone: f32) -> Self {
        Self {
            counters: Counters::default(),
            deadzone,
        }
    }

    /// Advance counters one tick. `None` means no controller is attached.
    pub fn update(&mut self, snapshot: Option<&GamepadSnapshot>) {
        let Some(pad) = snapshot else {
            self.counters = Counters::default();
            return;
        };

        let c = &mut self.counters;
        c.dpad_up = c.dpad_up.step(pad.dpad_up);
        c.dpad_down = c.dpad_down.step(pad.dpad_down);
        c.dpad_left = c.dpad_left.step(pad.dpad_left);
        c.dpad_right = c.dpad_right.step(pad.dpad_right);
        c.south = c.south.step(pad.south);
        c.east = c.east.step(pad.east);
        c.west = c.west.step(pad.west);
        c.north = c.north.step(pad.north);
        c.start = c.start.step(pad.start);
        c.select = c.select.step(pad.select);
        c.stick_up = c.stick_up.step(pad.stick_y < -self.deadzone);
        c.stick_down = c.stick_down.step(pad.stick_y > self.deadzone);
        c.stick_left = c.stick_left.step(pad.stick_x < -self.deadzone);
        c.stick_right = c.stick_right.step(pad.stick_x > self.deadzone);
    }

    /// Select/Back state, used as the alternate capture trigger
    pub fn select(&self) -> ButtonState {
        self.counters.select
    }
}

impl RawInputSource for ControllerSource {
    fn poll_button(&self, button: Button) -> ButtonState {
        let c = &self.counters;
        match button {
            Button::Up => c.dpad_up.max(c.stick_up),
            Button::Down => c.dpad_down.max(c.stick_down),
            Button::Left => c.dpad_left.max(c.stick_left),
            Button::Right => c.dpad_right.max(c.stick_right),
            // Both face-button pairs map to one logical button
            Button::B => c.east.max(c.west),
            Button::A => c.south.max(c.north),
            Button::Start => c.start,
        }
    }
}
