//! System FFI functions

use wasmtime::Caller;

use crate::wasm::{WasmContext, guest_bytes};

/// Frames per second, averaged over the last 60 ticks
pub(super) fn average_fps(caller: Caller<'_, WasmContext>) -> f32 {
    caller.data().console.average_fps
}

/// Ask the runtime to stop after the current tick
pub(super) fn quit(mut caller: Caller<'_, WasmContext>) {
    caller.data_mut().console.quit_requested = true;
}

/// Log a message from the game
pub(super) fn log_message(caller: Caller<'_, WasmContext>, ptr: u32, len: u32) {
    let Some(memory) = caller.data().memory else {
        return;
    };
    match guest_bytes(memory.data(&caller), ptr, len) {
        Some(bytes) => tracing::info!("[GAME] {}", String::from_utf8_lossy(bytes)),
        None => tracing::warn!(ptr, len, "log: message out of bounds"),
    }
}
