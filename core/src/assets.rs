//! Game file layout and sprite sheet loading
//!
//! A game is a `.wasm` file. Everything else it uses sits next to it and
//! shares its base name: `<base>.png` for sprites, `<base>.song<N>.mp3` and
//! `<base>.snd<N>.wav` for audio, `<base>.sav` for persisted lines.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::draw::SHEET_SIZE;
use crate::framebuffer::{Color, Surface};

/// Required game file extension
pub const GAME_EXTENSION: &str = "wasm";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("'{}' is not a .{GAME_EXTENSION} game file", path.display())]
    BadExtension { path: PathBuf },
    #[error("game file '{}' does not exist", path.display())]
    MissingGame { path: PathBuf },
    #[error("failed to load sprite sheet '{}': {source}", path.display())]
    SpriteSheet {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Paths of every file belonging to one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    game: PathBuf,
    base: PathBuf,
}

impl GamePaths {
    /// Validate the extension and derive the base name
    pub fn from_game_path(path: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let game = path.into();
        let has_extension = game
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(GAME_EXTENSION));
        if !has_extension {
            return Err(AssetError::BadExtension { path: game });
        }
        let base = game.with_extension("");
        Ok(Self { game, base })
    }

    pub fn game(&self) -> &Path {
        &self.game
    }

    /// Game name for window titles and logs
    pub fn name(&self) -> String {
        self.base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.base.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn sprite_sheet(&self) -> PathBuf {
        self.with_suffix(".png")
    }

    pub fn song(&self, slot: usize) -> PathBuf {
        self.with_suffix(&format!(".song{slot}.mp3"))
    }

    pub fn sample(&self, slot: usize) -> PathBuf {
        self.with_suffix(&format!(".snd{slot}.wav"))
    }

    pub fn save_file(&self) -> PathBuf {
        self.with_suffix(".sav")
    }

    /// Read the game module bytes
    pub fn read_game(&self) -> Result<Vec<u8>, AssetError> {
        std::fs::read(&self.game).map_err(|_| AssetError::MissingGame {
            path: self.game.clone(),
        })
    }
}

/// Decode a sprite sheet with magenta as the transparency key
pub fn load_sprite_sheet(path: &Path) -> Result<Surface, AssetError> {
    let image = image::open(path)
        .map_err(|source| AssetError::SpriteSheet {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    if width != SHEET_SIZE || height != SHEET_SIZE {
        tracing::warn!(
            "Sprite sheet {} is {}x{}, expected {}x{}",
            path.display(),
            width,
            height,
            SHEET_SIZE,
            SHEET_SIZE
        );
    }

    let sheet = Surface::from_rgba(width, height, image.as_raw())
        .unwrap_or_else(|| Surface::new(width, height));
    Ok(sheet.with_color_key(Color::MAGENTA))
}
