//! Scripting seam
//!
//! The scheduler only needs two entry points and access to the engine
//! context. [`crate::wasm::GameInstance`] is the production implementation.

use thiserror::Error;

use crate::context::ConsoleContext;

/// Script failures. All of them are fatal to the running game.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to compile game: {0}")]
    Compile(String),
    #[error("failed to instantiate game: {0}")]
    Instantiate(String),
    #[error("game does not export a `{0}` function")]
    MissingEntryPoint(&'static str),
    #[error("{entry}() failed: {message}")]
    Trap {
        entry: &'static str,
        message: String,
    },
}

/// A loaded game the scheduler can drive
pub trait ScriptHost {
    /// Run the game's one-time setup
    fn init(&mut self) -> Result<(), ScriptError>;
    /// Run one simulation step
    fn step(&mut self) -> Result<(), ScriptError>;
    fn context(&self) -> &ConsoleContext;
    fn context_mut(&mut self) -> &mut ConsoleContext;
}
