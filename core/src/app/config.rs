//! Configuration management (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. Missing sections and fields fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::console::TICK_RATE;
use crate::input::InputConfig;
use crate::input::keycode_serde::{keycode_to_string, string_to_keycode};
use crate::runtime::{Hotkeys, RuntimeConfig};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// How the 240x144 frame reaches the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Nearest-neighbour scaling on the CPU into a window-sized buffer
    Soft,
    /// GPU scaling of the native buffer
    #[default]
    Hard,
    /// GPU scaling, presentation paced by vertical sync
    HardVsync,
}

impl DisplayMode {
    pub fn vsync(self) -> bool {
        self == DisplayMode::HardVsync
    }
}

/// Video configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Borderless fullscreen (default: false)
    #[serde(default)]
    pub fullscreen: bool,
    /// Integer window scale; chosen from the monitor size when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

/// Audio configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Master volume level (default: 0.8, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub master_volume: f32,
}

/// Screenshot, recording and quit keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Screenshot keybinding (default: F6)
    #[serde(default = "default_screenshot_key")]
    pub screenshot: String,
    /// Start recording (default: F8)
    #[serde(default = "default_record_key")]
    pub record: String,
    /// Quit keybinding (default: Escape)
    #[serde(default = "default_quit_key")]
    pub quit: String,
    /// Length of the capture ring in seconds (default: 15)
    #[serde(default = "default_record_seconds")]
    pub record_seconds: u32,
}

fn default_screenshot_key() -> String {
    "F6".to_string()
}
fn default_record_key() -> String {
    "F8".to_string()
}
fn default_quit_key() -> String {
    "Escape".to_string()
}
fn default_record_seconds() -> u32 {
    15
}

fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    0.8
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            fullscreen: false,
            scale: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            master_volume: default_volume(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            screenshot: default_screenshot_key(),
            record: default_record_key(),
            quit: default_quit_key(),
            record_seconds: default_record_seconds(),
        }
    }
}

fn parse_hotkey(name: &str, value: &str, fallback: KeyCode) -> KeyCode {
    string_to_keycode(value).unwrap_or_else(|| {
        tracing::warn!(
            "Unknown key '{}' for capture.{}, using {}",
            value,
            name,
            keycode_to_string(&fallback)
        );
        fallback
    })
}

impl CaptureConfig {
    /// Resolve the hotkey names, falling back to defaults for unknown keys
    pub fn hotkeys(&self) -> Hotkeys {
        let defaults = Hotkeys::default();
        Hotkeys {
            quit: parse_hotkey("quit", &self.quit, defaults.quit),
            screenshot: parse_hotkey("screenshot", &self.screenshot, defaults.screenshot),
            record: parse_hotkey("record", &self.record, defaults.record),
        }
    }
}

impl Config {
    /// Scheduler settings derived from this configuration
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            capture_frames: self.capture.record_seconds as usize * TICK_RATE as usize,
            hotkeys: self.capture.hotkeys(),
            input: self.input.clone(),
            ..RuntimeConfig::default()
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Tinybox\config`
/// On macOS: `~/Library/Application Support/io.tinybox.Tinybox`
/// On Linux: `~/.config/tinybox`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.tinybox", "", "Tinybox")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    match config_dir() {
        Some(dir) => load_from(&dir.join("config.toml")),
        None => Config::default(),
    }
}

/// Loads a configuration file, falling back to defaults like [`load`].
pub fn load_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Validate that no keybindings conflict with each other.
///
/// Returns a list of warning messages for any conflicts found.
pub fn validate_keybindings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();
    let hotkeys = config.capture.hotkeys();
    let named = [
        (hotkeys.quit, "capture.quit"),
        (hotkeys.screenshot, "capture.screenshot"),
        (hotkeys.record, "capture.record"),
    ];

    let mut used: hashbrown::HashMap<KeyCode, &str> = hashbrown::HashMap::new();
    for (key, name) in named {
        if let Some(other) = used.insert(key, name) {
            warnings.push(format!(
                "{} key '{}' conflicts with {}",
                name,
                keycode_to_string(&key),
                other
            ));
        }
    }

    let mapping = &config.input.keyboard;
    for button in crate::console::Button::ALL {
        for key in mapping.keys(button) {
            if let Some(name) = used.get(key) {
                warnings.push(format!(
                    "input.keyboard.{} key '{}' is shadowed by {}",
                    button.name(),
                    keycode_to_string(key),
                    name
                ));
            }
        }
    }

    warnings
}
