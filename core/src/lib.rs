//! tinybox core - runtime for a 240x144 fantasy console
//!
//! Games are WebAssembly modules exporting `init` and `step`. The runtime
//! calls `step` sixty times a second and games draw into a fixed frame
//! buffer through a small set of host functions.
//!
//! # Architecture
//!
//! - [`Runtime`] - Fixed-timestep scheduler: input, step, capture, present, pacing
//! - [`ScriptHost`] - Seam between the scheduler and the scripting engine
//! - [`GameInstance`] - wasmtime implementation of [`ScriptHost`]
//! - [`InputUnifier`] - Keyboard and controller merged into 3-state buttons
//! - [`CaptureRing`] - Rolling frame capture, exported as an animated GIF

pub mod app;
pub mod assets;
pub mod audio;
pub mod capture;
pub mod console;
pub mod context;
pub mod draw;
pub mod export;
pub mod ffi;
pub mod framebuffer;
pub mod input;
pub mod runtime;
pub mod save_store;
pub mod script;
#[cfg(test)]
pub mod test_utils;
pub mod wasm;

pub use capture::{CaptureError, CaptureRing};
pub use console::{Audio, Button, ButtonState, Channel, NullAudio, VIEW_HEIGHT, VIEW_WIDTH};
pub use context::ConsoleContext;
pub use export::{ExportError, FrameExporter, GifExporter};
pub use framebuffer::{Color, Surface};
pub use input::{InputConfig, InputUnifier, RawInputSource};
pub use runtime::{Frontend, HostEvent, Runtime, RuntimeConfig, RuntimeError, TickOutcome};
pub use script::{ScriptError, ScriptHost};
pub use wasm::{GameInstance, WasmEngine};
