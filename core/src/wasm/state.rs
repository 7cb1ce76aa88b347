//! Store data and guest memory access

use wasmtime::{Memory, StoreLimits, StoreLimitsBuilder};

use crate::context::ConsoleContext;

/// Linear memory cap for games (16MB)
pub const DEFAULT_RAM_LIMIT: usize = 16 * 1024 * 1024;

/// Data attached to the wasmtime store
pub struct WasmContext {
    pub console: ConsoleContext,
    /// Exported `memory`, set after instantiation
    pub memory: Option<Memory>,
    pub(crate) limits: StoreLimits,
}

impl WasmContext {
    pub fn new(console: ConsoleContext) -> Self {
        Self::with_ram_limit(console, DEFAULT_RAM_LIMIT)
    }

    pub fn with_ram_limit(console: ConsoleContext, ram_limit: usize) -> Self {
        Self {
            console,
            memory: None,
            limits: StoreLimitsBuilder::new().memory_size(ram_limit).build(),
        }
    }
}

fn guest_range(ptr: u32, len: u32, size: usize) -> Option<std::ops::Range<usize>> {
    let start = ptr as usize;
    let end = start.checked_add(len as usize)?;
    (end <= size).then_some(start..end)
}

/// Bounds-checked view of `len` guest bytes at `ptr`
pub fn guest_bytes(data: &[u8], ptr: u32, len: u32) -> Option<&[u8]> {
    guest_range(ptr, len, data.len()).map(|range| &data[range])
}

/// Mutable variant of [`guest_bytes`]
pub fn guest_bytes_mut(data: &mut [u8], ptr: u32, len: u32) -> Option<&mut [u8]> {
    guest_range(ptr, len, data.len()).map(move |range| &mut data[range])
}
