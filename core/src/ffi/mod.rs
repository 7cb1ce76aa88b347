//! Host functions imported by games
//!
//! Every import lives in the `env` module. Arguments are coerced here
//! (colors clamped, ids and channels range-checked, strings bounds-checked)
//! before the typed primitives in [`crate::draw`], [`crate::input`] and
//! [`crate::console::Audio`] are called. Malformed arguments never trap.

mod audio;
mod draw;
mod input;
mod save;
mod system;


use anyhow::Result;
use wasmtime::{Global, GlobalType, Linker, Mutability, Store, Val, ValType};

use crate::console::{Button, VIEW_HEIGHT, VIEW_WIDTH};
use crate::wasm::WasmContext;

/// Register every host function with the linker
pub fn register_ffi(linker: &mut Linker<WasmContext>) -> Result<()> {
    // Drawing
    linker.func_wrap("env", "clear", draw::clear)?;
    linker.func_wrap("env", "square", draw::square)?;
    linker.func_wrap("env", "rectangle", draw::rectangle)?;
    linker.func_wrap("env", "sprite", draw::sprite)?;
    linker.func_wrap("env", "text", draw::text)?;

    // Input and helpers
    linker.func_wrap("env", "query_button", input::query_button)?;
    linker.func_wrap("env", "collide_squares", input::collide_squares)?;
    linker.func_wrap("env", "average_fps", system::average_fps)?;

    // Persistence
    linker.func_wrap("env", "read_persisted_lines", save::read_persisted_lines)?;
    linker.func_wrap("env", "write_persisted_lines", save::write_persisted_lines)?;

    // Audio
    linker.func_wrap("env", "play_song", audio::play_song)?;
    linker.func_wrap("env", "loop_song", audio::loop_song)?;
    linker.func_wrap("env", "stop_song", audio::stop_song)?;
    linker.func_wrap("env", "play_sample", audio::play_sample)?;
    linker.func_wrap("env", "loop_sample", audio::loop_sample)?;
    linker.func_wrap("env", "stop_sample", audio::stop_sample)?;

    // System
    linker.func_wrap("env", "quit", system::quit)?;
    linker.func_wrap("env", "log", system::log_message)?;

    Ok(())
}

/// Immutable `i32` globals importable from `env`
pub fn constants() -> Vec<(String, i32)> {
    let mut values = vec![
        ("view_width".to_string(), VIEW_WIDTH as i32),
        ("view_height".to_string(), VIEW_HEIGHT as i32),
    ];
    values.extend(
        Button::ALL
            .iter()
            .map(|button| (format!("button_{}", button.name()), *button as i32)),
    );
    values
}

/// Define the constant globals in the store and link them
pub fn define_constants(
    linker: &mut Linker<WasmContext>,
    store: &mut Store<WasmContext>,
) -> Result<()> {
    let ty = GlobalType::new(ValType::I32, Mutability::Const);
    for (name, value) in constants() {
        let global = Global::new(&mut *store, ty.clone(), Val::I32(value))?;
        linker.define(&*store, "env", &name, global)?;
    }
    Ok(())
}
