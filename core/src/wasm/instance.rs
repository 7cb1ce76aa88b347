//! Game instance implementation for loaded WASM modules

use wasmtime::{Instance, Linker, Module, Store, TypedFunc};

use super::engine::WasmEngine;
use super::state::WasmContext;
use crate::context::ConsoleContext;
use crate::ffi;
use crate::script::{ScriptError, ScriptHost};

/// A loaded and instantiated game
pub struct GameInstance {
    store: Store<WasmContext>,
    /// Not used after initialization, but keeps exported functions and
    /// memory alive.
    #[allow(dead_code)]
    instance: Instance,
    init_fn: TypedFunc<(), ()>,
    step_fn: TypedFunc<(), ()>,
}

impl GameInstance {
    /// Compile and instantiate a game from `.wasm` bytes
    pub fn load(
        engine: &WasmEngine,
        bytes: &[u8],
        console: ConsoleContext,
    ) -> Result<Self, ScriptError> {
        let module = engine.load_module(bytes)?;
        Self::new(engine, &module, WasmContext::new(console))
    }

    /// Instantiate a compiled module with the full host API linked in.
    ///
    /// Both `init` and `step` must be exported.
    pub fn new(
        engine: &WasmEngine,
        module: &Module,
        context: WasmContext,
    ) -> Result<Self, ScriptError> {
        let instantiate_err = |e: wasmtime::Error| ScriptError::Instantiate(format!("{:#}", e));

        let mut store = Store::new(engine.engine(), context);
        store.limiter(|state| &mut state.limits);

        let mut linker = Linker::new(engine.engine());
        ffi::register_ffi(&mut linker).map_err(instantiate_err)?;
        ffi::define_constants(&mut linker, &mut store).map_err(instantiate_err)?;

        let instance = linker
            .instantiate(&mut store, module)
            .map_err(instantiate_err)?;

        match instance.get_memory(&mut store, "memory") {
            Some(memory) => store.data_mut().memory = Some(memory),
            None => tracing::debug!("Game exports no memory; string calls will be ignored"),
        }

        let init_fn = instance
            .get_typed_func::<(), ()>(&mut store, "init")
            .map_err(|_| ScriptError::MissingEntryPoint("init"))?;
        let step_fn = instance
            .get_typed_func::<(), ()>(&mut store, "step")
            .map_err(|_| ScriptError::MissingEntryPoint("step"))?;

        Ok(Self {
            store,
            instance,
            init_fn,
            step_fn,
        })
    }

    fn invoke(
        store: &mut Store<WasmContext>,
        func: &TypedFunc<(), ()>,
        entry: &'static str,
    ) -> Result<(), ScriptError> {
        func.call(store, ()).map_err(|e| ScriptError::Trap {
            entry,
            message: format!("{:#}", e),
        })
    }

    pub fn store(&self) -> &Store<WasmContext> {
        &self.store
    }
}

impl ScriptHost for GameInstance {
    fn init(&mut self) -> Result<(), ScriptError> {
        Self::invoke(&mut self.store, &self.init_fn, "init")
    }

    fn step(&mut self) -> Result<(), ScriptError> {
        Self::invoke(&mut self.store, &self.step_fn, "step")
    }

    fn context(&self) -> &ConsoleContext {
        &self.store.data().console
    }

    fn context_mut(&mut self) -> &mut ConsoleContext {
        &mut self.store.data_mut().console
    }
}
