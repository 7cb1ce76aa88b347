//! WASM engine wrapper for loading and compiling modules

use wasmtime::{Engine, Module};

use crate::script::ScriptError;

/// Shared WASM engine (one per application)
pub struct WasmEngine {
    engine: Engine,
}

impl WasmEngine {
    pub fn new() -> Self {
        Self {
            engine: Engine::default(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compile a module from `.wasm` bytes (or WAT text)
    pub fn load_module(&self, bytes: &[u8]) -> Result<Module, ScriptError> {
        Module::new(&self.engine, bytes).map_err(|e| ScriptError::Compile(format!("{:#}", e)))
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}
