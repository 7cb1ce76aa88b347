//! Runtime tests

use std::time::{Duration, Instant};

use winit::keyboard::KeyCode;

use crate::capture::CaptureRing;
use crate::console::{Button, ButtonState, VIEW_HEIGHT, VIEW_WIDTH};
use crate::framebuffer::Color;
use crate::input::GamepadSnapshot;
use crate::script::{ScriptError, ScriptHost};
use crate::test_utils::{FnScript, RecordingExporter, TestFrontend};

use super::{FpsCounter, HostEvent, Runtime, RuntimeConfig, RuntimeError, TickOutcome};

fn runtime(script: FnScript) -> Runtime<FnScript, RecordingExporter> {
    runtime_with_ring(script, 4)
}

fn runtime_with_ring(script: FnScript, capacity: usize) -> Runtime<FnScript, RecordingExporter> {
    let ring = CaptureRing::new(capacity, VIEW_WIDTH, VIEW_HEIGHT);
    Runtime::with_ring(
        script,
        RecordingExporter::default(),
        RuntimeConfig::default(),
        ring,
    )
}

fn key(code: KeyCode, pressed: bool) -> HostEvent {
    HostEvent::Key {
        code,
        pressed,
        repeat: false,
    }
}

fn button(runtime: &Runtime<FnScript, RecordingExporter>, button: Button) -> ButtonState {
    runtime.script().context().input.state(button)
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_runtime_config_default() {
    let config = RuntimeConfig::default();
    assert_eq!(config.tick_rate, 60);
    assert_eq!(config.capture_frames, 900);
    assert_eq!(config.hotkeys.quit, KeyCode::Escape);
    assert_eq!(config.hotkeys.screenshot, KeyCode::F6);
    assert_eq!(config.hotkeys.record, KeyCode::F8);
    assert_eq!(config.tick_duration(), Duration::from_secs_f64(1.0 / 60.0));
}

// ============================================================================
// FPS Averaging
// ============================================================================

#[test]
fn test_fps_counter_reports_once_per_window() {
    let start = Instant::now();
    let mut fps = FpsCounter::new(60, start);
    for i in 1..60 {
        assert_eq!(fps.tick(start + Duration::from_millis(i * 16)), None);
    }
    let average = fps.tick(start + Duration::from_secs(1)).unwrap();
    assert!((average - 60.0).abs() < 0.01);
}

#[test]
fn test_fps_counter_slow_window() {
    let start = Instant::now();
    let mut fps = FpsCounter::new(2, start);
    assert_eq!(fps.tick(start), None);
    let average = fps.tick(start + Duration::from_secs(1)).unwrap();
    assert!((average - 2.0).abs() < 0.01);

    // The next window starts where the last one ended
    assert_eq!(fps.tick(start + Duration::from_secs(2)), None);
    let average = fps.tick(start + Duration::from_secs(5)).unwrap();
    assert!((average - 0.5).abs() < 0.01);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_start_presents_then_runs_init() {
    let mut runtime = runtime(FnScript::idle().with_init(|ctx| {
        ctx.framebuffer.fill(Color::WHITE);
        Ok(())
    }));
    let mut frontend = TestFrontend::new();

    runtime.start(&mut frontend).unwrap();

    assert_eq!(runtime.script().inits, 1);
    assert_eq!(frontend.presented, 1);
    // The blank frame is shown before init draws
    assert_eq!(frontend.last_frame.unwrap().pixels()[0], Color::BLACK);
}

#[test]
fn test_init_failure_is_fatal() {
    let mut runtime = runtime(FnScript::idle().with_init(|_| {
        Err(ScriptError::Trap {
            entry: "init",
            message: "unreachable".into(),
        })
    }));
    let err = runtime.start(&mut TestFrontend::new()).unwrap_err();
    assert!(matches!(err, RuntimeError::Script(ScriptError::Trap { entry: "init", .. })));
}

#[test]
fn test_tick_steps_once_and_presents() {
    let mut runtime = runtime(FnScript::new(|ctx| {
        ctx.framebuffer.fill(Color::rgb(1, 2, 3));
        Ok(())
    }));
    let mut frontend = TestFrontend::new();

    for _ in 0..3 {
        assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Continue);
    }

    assert_eq!(runtime.script().steps, 3);
    assert_eq!(runtime.ticks(), 3);
    assert_eq!(frontend.presented, 3);
    assert_eq!(frontend.last_frame.unwrap().pixels()[0], Color::rgb(1, 2, 3));
}

#[test]
fn test_step_failure_is_fatal() {
    let mut runtime = runtime(FnScript::new(|_| {
        Err(ScriptError::Trap {
            entry: "step",
            message: "divide by zero".into(),
        })
    }));
    let mut frontend = TestFrontend::new();

    let err = runtime.tick(&mut frontend).unwrap_err();
    assert_eq!(err.to_string(), "step() failed: divide by zero");
    assert_eq!(frontend.presented, 0);
}

#[test]
fn test_present_failure_keeps_running() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend {
        fail_present: true,
        ..TestFrontend::default()
    };

    assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Continue);
    assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Continue);
    assert_eq!(frontend.presented, 2);
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn test_close_request_quits_after_tick() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![HostEvent::CloseRequested]);

    assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Quit);
    // The tick still ran to completion
    assert_eq!(runtime.script().steps, 1);
    assert_eq!(frontend.presented, 1);
}

#[test]
fn test_quit_hotkey() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::Escape, true)]);
    assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Quit);
}

#[test]
fn test_script_quit_request() {
    let mut runtime = runtime(FnScript::new(|ctx| {
        ctx.quit_requested = true;
        Ok(())
    }));
    assert_eq!(
        runtime.tick(&mut TestFrontend::new()).unwrap(),
        TickOutcome::Quit
    );
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_key_press_latches_to_held() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::KeyZ, true)]);
    frontend.push_tick(vec![]);
    frontend.push_tick(vec![]);
    frontend.push_tick(vec![key(KeyCode::KeyZ, false)]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::A), ButtonState::JustPressed);
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::A), ButtonState::Held);
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::A), ButtonState::Held);
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::A), ButtonState::Released);
}

#[test]
fn test_key_repeat_is_ignored() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![HostEvent::Key {
        code: KeyCode::ArrowUp,
        pressed: true,
        repeat: true,
    }]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::Up), ButtonState::Released);
}

#[test]
fn test_unmapped_key_is_ignored() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::KeyP, true)]);

    runtime.tick(&mut frontend).unwrap();
    for b in Button::ALL {
        assert_eq!(button(&runtime, b), ButtonState::Released);
    }
}

#[test]
fn test_configured_binding_first_button_wins() {
    let mut config = RuntimeConfig::default();
    config.input.keyboard.up = vec![KeyCode::KeyQ];
    config.input.keyboard.a = vec![KeyCode::KeyQ];
    let mut runtime = Runtime::with_ring(
        FnScript::idle(),
        RecordingExporter::default(),
        config,
        CaptureRing::disabled(4),
    );
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::KeyQ, true)]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::Up), ButtonState::JustPressed);
    assert_eq!(button(&runtime, Button::A), ButtonState::Released);
}

#[test]
fn test_rebound_default_key_is_unmapped() {
    let mut config = RuntimeConfig::default();
    config.input.keyboard.up = vec![KeyCode::KeyQ];
    let mut runtime = Runtime::with_ring(
        FnScript::idle(),
        RecordingExporter::default(),
        config,
        CaptureRing::disabled(4),
    );
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::ArrowUp, true)]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::Up), ButtonState::Released);
}

#[test]
fn test_focus_lost_releases_keys() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::Enter, true)]);
    frontend.push_tick(vec![HostEvent::FocusLost]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::Start), ButtonState::JustPressed);
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::Start), ButtonState::Released);
}

#[test]
fn test_input_visible_during_step() {
    let mut runtime = runtime(FnScript::new(|ctx| {
        if ctx.input.state(Button::Left) == ButtonState::JustPressed {
            ctx.framebuffer.fill(Color::WHITE);
        }
        Ok(())
    }));
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::ArrowLeft, true)]);

    runtime.tick(&mut frontend).unwrap();
    assert_eq!(frontend.last_frame.unwrap().pixels()[0], Color::WHITE);
}

#[test]
fn test_keyboard_and_controller_merge() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.controller = Some(GamepadSnapshot {
        east: true,
        ..GamepadSnapshot::default()
    });

    runtime.tick(&mut frontend).unwrap();
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::B), ButtonState::Held);

    // A fresh key press does not lower the merged value
    frontend.push_tick(vec![key(KeyCode::KeyX, true)]);
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(button(&runtime, Button::B), ButtonState::Held);
}

#[test]
fn test_stick_debounce_through_runtime() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.controller = Some(GamepadSnapshot {
        stick_x: 1.0,
        ..GamepadSnapshot::default()
    });

    let mut seen = Vec::new();
    for _ in 0..3 {
        runtime.tick(&mut frontend).unwrap();
        seen.push(button(&runtime, Button::Right));
    }
    frontend.controller = Some(GamepadSnapshot::default());
    runtime.tick(&mut frontend).unwrap();
    seen.push(button(&runtime, Button::Right));

    assert_eq!(
        seen,
        vec![
            ButtonState::JustPressed,
            ButtonState::Held,
            ButtonState::Held,
            ButtonState::Released,
        ]
    );
}

// ============================================================================
// Capture
// ============================================================================

#[test]
fn test_record_hotkey_fills_and_flushes_ring() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::F8, true)]);

    runtime.tick(&mut frontend).unwrap();
    assert!(runtime.ring().is_armed());
    assert_eq!(runtime.ring().cursor(), 1);

    for _ in 0..3 {
        runtime.tick(&mut frontend).unwrap();
    }
    assert!(!runtime.ring().is_armed());
    assert_eq!(runtime.ring().cursor(), 0);
    assert_eq!(runtime.exporter().exports.len(), 1);
    assert_eq!(runtime.exporter().exports[0].len(), 4);

    // Stays idle until re-armed
    runtime.tick(&mut frontend).unwrap();
    assert_eq!(runtime.ring().cursor(), 0);
}

#[test]
fn test_captured_frames_follow_step() {
    let mut shade = 0u8;
    let mut runtime = runtime(FnScript::new(move |ctx| {
        shade += 10;
        ctx.framebuffer.fill(Color::rgb(shade, 0, 0));
        Ok(())
    }));
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::F8, true)]);

    for _ in 0..4 {
        runtime.tick(&mut frontend).unwrap();
    }
    let reds: Vec<u8> = runtime.exporter().exports[0]
        .iter()
        .map(|slot| slot.pixels()[0].r)
        .collect();
    assert_eq!(reds, vec![10, 20, 30, 40]);
}

#[test]
fn test_controller_select_arms_capture() {
    let mut runtime = runtime(FnScript::idle());
    let mut frontend = TestFrontend::new();
    frontend.controller = Some(GamepadSnapshot {
        select: true,
        ..GamepadSnapshot::default()
    });

    runtime.tick(&mut frontend).unwrap();
    assert!(runtime.ring().is_armed());
    assert_eq!(runtime.ring().cursor(), 1);

    // Holding select does not re-arm after the flush
    for _ in 0..5 {
        runtime.tick(&mut frontend).unwrap();
    }
    assert_eq!(runtime.exporter().exports.len(), 1);
    assert!(!runtime.ring().is_armed());
}

#[test]
fn test_disabled_capture_keeps_running() {
    let mut runtime = runtime_with_ring(FnScript::idle(), 0);
    let mut frontend = TestFrontend::new();
    frontend.push_tick(vec![key(KeyCode::F8, true)]);

    assert_eq!(runtime.tick(&mut frontend).unwrap(), TickOutcome::Continue);
    assert!(!runtime.ring().is_armed());
    assert!(runtime.exporter().exports.is_empty());
}

#[test]
fn test_screenshot_hotkey_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    let config = RuntimeConfig {
        screenshot_path: path.clone(),
        ..RuntimeConfig::default()
    };
    let mut runtime = Runtime::with_ring(
        FnScript::idle(),
        RecordingExporter::default(),
        config,
        CaptureRing::disabled(4),
    );
    let mut frontend = TestFrontend::new();

    runtime.tick(&mut frontend).unwrap();
    assert!(!path.exists());

    frontend.push_tick(vec![key(KeyCode::F6, true)]);
    runtime.tick(&mut frontend).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}
