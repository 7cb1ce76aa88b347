//! Windowed application
//!
//! - [`config`] - `config.toml` loading and defaults
//! - [`presenter`] - Frame buffer presentation through `pixels`
//! - [`event_loop`] - winit application that runs a game until it quits

pub mod config;
pub mod event_loop;
pub mod presenter;

pub use config::{Config, DisplayMode};
pub use event_loop::{RunOptions, run};
pub use presenter::{Presenter, window_scale};
