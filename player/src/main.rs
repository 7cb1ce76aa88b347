//! tinybox player
//!
//! Runs one game: `tinybox [--soft|--hard|--hard-vsync] [--fullscreen|--window] [--scale N] game.wasm`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tinybox_core::app::{self, Config, DisplayMode, RunOptions};

/// Command-line arguments; flags override `config.toml`
#[derive(Debug, Parser)]
#[command(name = "tinybox", version, about = "Play a tinybox game")]
struct Cli {
    /// Scale on the CPU
    #[arg(long, conflicts_with_all = ["hard", "hard_vsync"])]
    soft: bool,
    /// Scale on the GPU
    #[arg(long, conflicts_with = "hard_vsync")]
    hard: bool,
    /// Scale on the GPU and pace by vertical sync
    #[arg(long)]
    hard_vsync: bool,
    /// Borderless fullscreen
    #[arg(long, conflicts_with = "window")]
    fullscreen: bool,
    /// Windowed, even if the config asks for fullscreen
    #[arg(long)]
    window: bool,
    /// Integer window scale
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    scale: Option<u32>,
    /// Game file (.wasm)
    game: PathBuf,
}

impl Cli {
    fn display_mode(&self) -> Option<DisplayMode> {
        if self.soft {
            Some(DisplayMode::Soft)
        } else if self.hard {
            Some(DisplayMode::Hard)
        } else if self.hard_vsync {
            Some(DisplayMode::HardVsync)
        } else {
            None
        }
    }

    /// Apply the command-line overrides on top of the loaded config
    fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.display_mode() {
            config.video.display_mode = mode;
        }
        if self.fullscreen {
            config.video.fullscreen = true;
        }
        if self.window {
            config.video.fullscreen = false;
        }
        if let Some(scale) = self.scale {
            config.video.scale = Some(scale);
        }
    }
}

fn show_error(error: &anyhow::Error) {
    eprintln!("tinybox: {:#}", error);
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("tinybox")
        .set_description(format!("{:#}", error))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = app::config::load();
    cli.apply(&mut config);

    let options = RunOptions {
        game: cli.game,
        config,
    };
    match app::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {:#}", e);
            show_error(&e);
            ExitCode::FAILURE
        }
    }
}
