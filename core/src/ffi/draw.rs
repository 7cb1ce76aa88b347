//! Drawing FFI functions

use wasmtime::Caller;

use crate::draw;
use crate::framebuffer::Color;
use crate::wasm::{WasmContext, guest_bytes};

pub(super) fn clear(mut caller: Caller<'_, WasmContext>, r: i32, g: i32, b: i32) {
    let console = &mut caller.data_mut().console;
    draw::clear(&mut console.framebuffer, Color::clamped(r, g, b));
}

#[allow(clippy::too_many_arguments)]
pub(super) fn square(
    mut caller: Caller<'_, WasmContext>,
    x: i32,
    y: i32,
    scale: f32,
    r: i32,
    g: i32,
    b: i32,
) {
    let console = &mut caller.data_mut().console;
    draw::square(
        &mut console.framebuffer,
        x,
        y,
        scale as f64,
        Color::clamped(r, g, b),
    );
}

#[allow(clippy::too_many_arguments)]
pub(super) fn rectangle(
    mut caller: Caller<'_, WasmContext>,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    g: i32,
    b: i32,
) {
    let console = &mut caller.data_mut().console;
    draw::rectangle(&mut console.framebuffer, x, y, w, h, Color::clamped(r, g, b));
}

pub(super) fn sprite(
    mut caller: Caller<'_, WasmContext>,
    x: i32,
    y: i32,
    scale: f32,
    sheet_x: i32,
    sheet_y: i32,
) {
    let console = &mut caller.data_mut().console;
    draw::sprite(
        &mut console.framebuffer,
        &console.sprites,
        x,
        y,
        scale as f64,
        sheet_x,
        sheet_y,
    );
}

/// Draw `len` raw bytes from guest memory
#[allow(clippy::too_many_arguments)]
pub(super) fn text(
    mut caller: Caller<'_, WasmContext>,
    ptr: u32,
    len: u32,
    x: i32,
    y: i32,
    scale: f32,
    mode: i32,
) {
    let Some(memory) = caller.data().memory else {
        tracing::warn!("text: game exports no memory");
        return;
    };
    let (data, state) = memory.data_and_store_mut(&mut caller);
    let Some(bytes) = guest_bytes(data, ptr, len) else {
        tracing::warn!(ptr, len, "text: string out of bounds");
        return;
    };
    let console = &mut state.console;
    draw::text(
        &mut console.framebuffer,
        &console.font,
        bytes,
        x,
        y,
        scale as f64,
        mode,
    );
}
