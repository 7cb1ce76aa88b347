//! Gamepad polling through gilrs
//!
//! Only one controller drives the console. The first one seen is used and
//! any others are logged and ignored until it disconnects.

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};

use super::GamepadSnapshot;

pub struct GamepadPoller {
    /// None if gilrs failed to initialize
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
}

impl GamepadPoller {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        };
        let active = gilrs
            .as_ref()
            .and_then(|g| g.gamepads().next().map(|(id, _)| id));
        if let Some(id) = active {
            tracing::info!("Using gamepad {}", id);
        }
        Self { gilrs, active }
    }

    /// Drain connection events and read the active controller
    pub fn poll(&mut self) -> Option<GamepadSnapshot> {
        let gilrs = self.gilrs.as_mut()?;

        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected => match self.active {
                    None => {
                        self.active = Some(event.id);
                        tracing::info!("Gamepad {} connected", event.id);
                    }
                    Some(active) if active != event.id => {
                        tracing::info!(
                            "Gamepad {} connected; only gamepad {} is used",
                            event.id,
                            active
                        );
                    }
                    Some(_) => {}
                },
                EventType::Disconnected if self.active == Some(event.id) => {
                    tracing::info!("Gamepad {} disconnected", event.id);
                    self.active = gilrs
                        .gamepads()
                        .map(|(id, _)| id)
                        .find(|id| *id != event.id);
                }
                _ => {}
            }
        }

        let gamepad = gilrs.connected_gamepad(self.active?)?;
        let btn = |button: Button| gamepad.is_pressed(button);

        Some(GamepadSnapshot {
            dpad_up: btn(Button::DPadUp),
            dpad_down: btn(Button::DPadDown),
            dpad_left: btn(Button::DPadLeft),
            dpad_right: btn(Button::DPadRight),
            south: btn(Button::South),
            east: btn(Button::East),
            west: btn(Button::West),
            north: btn(Button::North),
            start: btn(Button::Start),
            select: btn(Button::Select),
            stick_x: gamepad.value(Axis::LeftStickX),
            // gilrs reports up as positive
            stick_y: -gamepad.value(Axis::LeftStickY),
        })
    }
}

impl Default for GamepadPoller {
    fn default() -> Self {
        Self::new()
    }
}
