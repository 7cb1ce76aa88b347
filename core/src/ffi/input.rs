//! Input and collision FFI functions

use wasmtime::Caller;

use crate::draw;
use crate::wasm::WasmContext;

/// 0 = released, 1 = just pressed, 2 = held
pub(super) fn query_button(caller: Caller<'_, WasmContext>, id: i32) -> i32 {
    caller.data().console.input.query(id) as i32
}

pub(super) fn collide_squares(
    _caller: Caller<'_, WasmContext>,
    x1: f32,
    y1: f32,
    s1: f32,
    x2: f32,
    y2: f32,
    s2: f32,
) -> i32 {
    draw::collide_squares(
        x1 as f64, y1 as f64, s1 as f64, x2 as f64, y2 as f64, s2 as f64,
    ) as i32
}
