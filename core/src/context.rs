//! Engine state reachable from host functions

use crate::console::{Audio, NullAudio, VIEW_HEIGHT, VIEW_WIDTH};
use crate::draw::{FontAtlas, SHEET_SIZE};
use crate::framebuffer::{Color, Surface};
use crate::input::InputUnifier;
use crate::save_store::SaveStore;

/// Everything a running game can touch.
///
/// Owned by the script host; the scheduler reaches it through
/// [`ScriptHost::context`](crate::script::ScriptHost::context).
pub struct ConsoleContext {
    /// The 240x144 frame buffer games draw into
    pub framebuffer: Surface,
    /// 128x128 sprite sheet, magenta keyed
    pub sprites: Surface,
    pub font: FontAtlas,
    /// Canonical button states for the current tick
    pub input: InputUnifier,
    /// Last computed frames-per-second average
    pub average_fps: f32,
    /// None when the game has no save location
    pub saves: Option<SaveStore>,
    pub audio: Box<dyn Audio>,
    /// Set by the game's `quit()` call
    pub quit_requested: bool,
}

impl ConsoleContext {
    pub fn new(sprites: Surface, saves: Option<SaveStore>, audio: Box<dyn Audio>) -> Self {
        Self {
            framebuffer: Surface::new(VIEW_WIDTH, VIEW_HEIGHT),
            sprites,
            font: FontAtlas::new(),
            input: InputUnifier::new(),
            average_fps: 0.0,
            saves,
            audio,
            quit_requested: false,
        }
    }

    /// Context with a blank sprite sheet, no saves and silent audio
    pub fn headless() -> Self {
        let sprites = Surface::new(SHEET_SIZE, SHEET_SIZE).with_color_key(Color::MAGENTA);
        Self::new(sprites, None, Box::new(NullAudio))
    }
}
