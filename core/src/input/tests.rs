//! Input unifier tests

use winit::keyboard::KeyCode;

use super::keycode_serde::{keycode_to_string, string_to_keycode};
use super::*;
use crate::console::{Button, ButtonState};

const DEADZONE: f32 = 13000.0 / 32767.0;

fn pressed(f: impl FnOnce(&mut GamepadSnapshot)) -> GamepadSnapshot {
    let mut pad = GamepadSnapshot::default();
    f(&mut pad);
    pad
}

// ============================================================================
// Keyboard Source Tests
// ============================================================================

#[test]
fn test_keyboard_press_then_hold() {
    let mut kb = KeyboardSource::new();
    kb.press(Button::A);
    kb.latch();
    assert_eq!(kb.poll_button(Button::A), ButtonState::JustPressed);
    kb.latch();
    assert_eq!(kb.poll_button(Button::A), ButtonState::Held);
    kb.latch();
    assert_eq!(kb.poll_button(Button::A), ButtonState::Held);
}

#[test]
fn test_keyboard_release_clears_immediately() {
    let mut kb = KeyboardSource::new();
    kb.press(Button::Left);
    kb.latch();
    kb.latch();
    kb.release(Button::Left);
    kb.latch();
    assert_eq!(kb.poll_button(Button::Left), ButtonState::Released);

    // Next press starts over at JustPressed
    kb.press(Button::Left);
    kb.latch();
    assert_eq!(kb.poll_button(Button::Left), ButtonState::JustPressed);
}

#[test]
fn test_keyboard_repeat_press_does_not_reset() {
    let mut kb = KeyboardSource::new();
    kb.press(Button::Start);
    kb.latch();
    kb.latch();
    kb.press(Button::Start);
    kb.latch();
    assert_eq!(kb.poll_button(Button::Start), ButtonState::Held);
}

#[test]
fn test_keyboard_tap_within_one_tick() {
    let mut kb = KeyboardSource::new();
    kb.press(Button::B);
    kb.release(Button::B);
    kb.latch();
    assert_eq!(kb.poll_button(Button::B), ButtonState::Released);
}

// ============================================================================
// Controller Source Tests
// ============================================================================

#[test]
fn test_controller_button_counter() {
    let mut pad = ControllerSource::new(DEADZONE);
    let held = pressed(|p| p.start = true);

    pad.update(Some(&held));
    assert_eq!(pad.poll_button(Button::Start), ButtonState::JustPressed);
    pad.update(Some(&held));
    assert_eq!(pad.poll_button(Button::Start), ButtonState::Held);
    pad.update(Some(&GamepadSnapshot::default()));
    assert_eq!(pad.poll_button(Button::Start), ButtonState::Released);
}

#[test]
fn test_controller_face_button_pairs() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.north = true)));
    assert_eq!(pad.poll_button(Button::A), ButtonState::JustPressed);
    assert_eq!(pad.poll_button(Button::B), ButtonState::Released);

    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.west = true)));
    assert_eq!(pad.poll_button(Button::B), ButtonState::JustPressed);

    // Holding one member and tapping the other keeps the older count
    pad.update(Some(&pressed(|p| {
        p.west = true;
        p.east = true;
    })));
    assert_eq!(pad.poll_button(Button::B), ButtonState::Held);
}

#[test]
fn test_stick_debounce_and_immediate_reset() {
    let mut pad = ControllerSource::new(DEADZONE);
    let right = pressed(|p| p.stick_x = 0.9);

    pad.update(Some(&right));
    assert_eq!(pad.poll_button(Button::Right), ButtonState::JustPressed);
    pad.update(Some(&right));
    assert_eq!(pad.poll_button(Button::Right), ButtonState::Held);
    pad.update(Some(&right));
    assert_eq!(pad.poll_button(Button::Right), ButtonState::Held);

    pad.update(Some(&pressed(|p| p.stick_x = 0.1)));
    assert_eq!(pad.poll_button(Button::Right), ButtonState::Released);
}

#[test]
fn test_stick_inside_deadzone_is_released() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| {
        p.stick_x = -0.39;
        p.stick_y = 0.39;
    })));
    assert_eq!(pad.poll_button(Button::Left), ButtonState::Released);
    assert_eq!(pad.poll_button(Button::Down), ButtonState::Released);
}

#[test]
fn test_stick_up_is_negative_y() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.stick_y = -1.0)));
    assert_eq!(pad.poll_button(Button::Up), ButtonState::JustPressed);
    assert_eq!(pad.poll_button(Button::Down), ButtonState::Released);
}

#[test]
fn test_dpad_and_stick_merge() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.dpad_up = true)));
    pad.update(Some(&pressed(|p| {
        p.dpad_up = true;
        p.stick_y = -1.0;
    })));
    assert_eq!(pad.poll_button(Button::Up), ButtonState::Held);
}

#[test]
fn test_controller_detached_reads_released() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.south = true)));
    pad.update(None);
    for button in Button::ALL {
        assert_eq!(pad.poll_button(button), ButtonState::Released);
    }
    assert_eq!(pad.select(), ButtonState::Released);
}

#[test]
fn test_select_counter() {
    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| p.select = true)));
    assert_eq!(pad.select(), ButtonState::JustPressed);
    pad.update(Some(&pressed(|p| p.select = true)));
    assert_eq!(pad.select(), ButtonState::Held);
}

// ============================================================================
// Unifier Tests
// ============================================================================

#[test]
fn test_unifier_takes_maximum() {
    let mut kb = KeyboardSource::new();
    kb.press(Button::A);
    kb.latch();
    kb.latch();

    let mut pad = ControllerSource::new(DEADZONE);
    pad.update(Some(&pressed(|p| {
        p.south = true;
        p.start = true;
    })));

    let mut unifier = InputUnifier::new();
    unifier.merge(&[&kb, &pad]);

    assert_eq!(unifier.state(Button::A), ButtonState::Held);
    assert_eq!(unifier.state(Button::Start), ButtonState::JustPressed);
    assert_eq!(unifier.state(Button::Up), ButtonState::Released);
}

#[test]
fn test_unifier_query_out_of_range() {
    let unifier = InputUnifier::new();
    assert_eq!(unifier.query(7), ButtonState::Released);
    assert_eq!(unifier.query(-3), ButtonState::Released);
}

#[test]
fn test_unifier_no_sources() {
    let mut unifier = InputUnifier::new();
    unifier.merge(&[]);
    assert_eq!(unifier.query(0), ButtonState::Released);
}

// ============================================================================
// Mapping Tests
// ============================================================================

#[test]
fn test_default_mapping() {
    let mapping = KeyboardMapping::default();
    assert_eq!(mapping.button_for(KeyCode::KeyZ), Some(Button::A));
    assert_eq!(mapping.button_for(KeyCode::Digit2), Some(Button::A));
    assert_eq!(mapping.button_for(KeyCode::KeyA), Some(Button::B));
    assert_eq!(mapping.button_for(KeyCode::NumpadEnter), Some(Button::Start));
    assert_eq!(mapping.button_for(KeyCode::ArrowLeft), Some(Button::Left));
    assert_eq!(mapping.button_for(KeyCode::F6), None);
}

#[test]
fn test_keycode_names() {
    assert_eq!(keycode_to_string(&KeyCode::ArrowUp), "ArrowUp");
    assert_eq!(keycode_to_string(&KeyCode::Pause), "Unknown");
    assert_eq!(string_to_keycode("f8"), Some(KeyCode::F8));
    assert_eq!(string_to_keycode("Esc"), Some(KeyCode::Escape));
    assert_eq!(string_to_keycode("Bogus"), None);
}

#[test]
fn test_mapping_toml_roundtrip() {
    let mapping = KeyboardMapping::default();
    let text = toml::to_string(&mapping).unwrap();
    assert!(text.contains("\"ArrowUp\""));
    let parsed: KeyboardMapping = toml::from_str(&text).unwrap();
    assert_eq!(parsed, mapping);
}

#[test]
fn test_mapping_partial_and_invalid() {
    let parsed: KeyboardMapping = toml::from_str("a = [\"J\", \"K\"]").unwrap();
    assert_eq!(parsed.a, vec![KeyCode::KeyJ, KeyCode::KeyK]);
    assert_eq!(parsed.up, vec![KeyCode::ArrowUp]);

    let err = toml::from_str::<KeyboardMapping>("a = [\"Nope\"]");
    assert!(err.is_err());
}

#[test]
fn test_input_config_default_deadzone() {
    let config = InputConfig::default();
    assert!((config.stick_deadzone - DEADZONE).abs() < f32::EPSILON);
}
