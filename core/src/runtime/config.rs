//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use winit::keyboard::KeyCode;

use crate::capture::{DEFAULT_CAPTURE_FRAMES, SCREENSHOT_FILE};
use crate::console::TICK_RATE;
use crate::input::InputConfig;

/// Keys handled by the runtime itself rather than the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkeys {
    pub quit: KeyCode,
    pub screenshot: KeyCode,
    pub record: KeyCode,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            quit: KeyCode::Escape,
            screenshot: KeyCode::F6,
            record: KeyCode::F8,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Target tick rate in Hz
    pub tick_rate: u32,
    /// Warning threshold for a single `step` call
    pub cpu_budget: Duration,
    /// Capture ring length in ticks
    pub capture_frames: usize,
    pub screenshot_path: PathBuf,
    pub hotkeys: Hotkeys,
    pub input: InputConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            cpu_budget: Duration::from_millis(8),
            capture_frames: DEFAULT_CAPTURE_FRAMES,
            screenshot_path: PathBuf::from(SCREENSHOT_FILE),
            hotkeys: Hotkeys::default(),
            input: InputConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}
