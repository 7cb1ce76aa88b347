//! WASM runtime wrapper
//!
//! - [`WasmEngine`] - Shared wasmtime engine
//! - [`GameInstance`] - Loaded and instantiated game, the production [`ScriptHost`]
//! - [`WasmContext`] - Store data: engine context plus the guest memory handle
//!
//! [`ScriptHost`]: crate::script::ScriptHost

mod engine;
mod instance;
mod state;


pub use engine::WasmEngine;
pub use instance::GameInstance;
pub use state::{DEFAULT_RAM_LIMIT, WasmContext, guest_bytes, guest_bytes_mut};
