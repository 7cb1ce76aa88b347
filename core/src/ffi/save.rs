//! Save file FFI functions
//!
//! The save file is a list of byte lines. Games see it as one buffer of
//! `\n`-terminated lines.

use wasmtime::Caller;

use crate::save_store::{join_lines, split_lines};
use crate::wasm::{WasmContext, guest_bytes, guest_bytes_mut};

/// Copy the saved lines into guest memory.
///
/// At most `max_len` bytes are copied. Returns the full length of the
/// joined lines so games can detect truncation, or -1 on failure.
pub(super) fn read_persisted_lines(
    mut caller: Caller<'_, WasmContext>,
    ptr: u32,
    max_len: u32,
) -> i32 {
    let Some(memory) = caller.data().memory else {
        tracing::warn!("read_persisted_lines: game exports no memory");
        return -1;
    };
    let Some(store) = caller.data().console.saves.as_ref() else {
        return 0;
    };

    let lines = match store.read_lines() {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "Failed to read save file");
            return -1;
        }
    };
    let bytes = join_lines(&lines);

    let count = bytes.len().min(max_len as usize);
    let Some(dest) = guest_bytes_mut(memory.data_mut(&mut caller), ptr, count as u32) else {
        tracing::warn!(ptr, max_len, "read_persisted_lines: buffer out of bounds");
        return -1;
    };
    dest.copy_from_slice(&bytes[..count]);

    i32::try_from(bytes.len()).unwrap_or(i32::MAX)
}

/// Replace the save file with the `\n`-separated lines in guest memory.
///
/// Returns 1 on success, 0 on failure.
pub(super) fn write_persisted_lines(mut caller: Caller<'_, WasmContext>, ptr: u32, len: u32) -> i32 {
    let Some(memory) = caller.data().memory else {
        tracing::warn!("write_persisted_lines: game exports no memory");
        return 0;
    };
    let (data, state) = memory.data_and_store_mut(&mut caller);
    let Some(bytes) = guest_bytes(data, ptr, len) else {
        tracing::warn!(ptr, len, "write_persisted_lines: buffer out of bounds");
        return 0;
    };
    let Some(store) = state.console.saves.as_ref() else {
        tracing::warn!("write_persisted_lines: no save location");
        return 0;
    };

    match store.write_lines(&split_lines(bytes)) {
        Ok(()) => 1,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "Failed to write save file");
            0
        }
    }
}
