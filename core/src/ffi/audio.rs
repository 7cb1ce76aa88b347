//! Audio FFI functions
//!
//! Invalid ids and channels are ignored.

use wasmtime::Caller;

use crate::console::{AUDIO_SLOTS, Channel};
use crate::wasm::WasmContext;

fn slot(id: i32) -> Option<usize> {
    usize::try_from(id).ok().filter(|&id| id < AUDIO_SLOTS)
}

fn start_song(caller: &mut Caller<'_, WasmContext>, id: i32, looping: bool) {
    match slot(id) {
        Some(id) => caller.data_mut().console.audio.play_song(id, looping),
        None => tracing::debug!(id, "Ignoring invalid song id"),
    }
}

fn start_sample(caller: &mut Caller<'_, WasmContext>, id: i32, channel: i32, looping: bool) {
    match (slot(id), Channel::from_raw(channel)) {
        (Some(id), Some(channel)) => caller
            .data_mut()
            .console
            .audio
            .play_sample(id, channel, looping),
        _ => tracing::debug!(id, channel, "Ignoring invalid sample id or channel"),
    }
}

pub(super) fn play_song(mut caller: Caller<'_, WasmContext>, id: i32) {
    start_song(&mut caller, id, false);
}

pub(super) fn loop_song(mut caller: Caller<'_, WasmContext>, id: i32) {
    start_song(&mut caller, id, true);
}

pub(super) fn stop_song(mut caller: Caller<'_, WasmContext>) {
    caller.data_mut().console.audio.stop_song();
}

pub(super) fn play_sample(mut caller: Caller<'_, WasmContext>, id: i32, channel: i32) {
    start_sample(&mut caller, id, channel, false);
}

pub(super) fn loop_sample(mut caller: Caller<'_, WasmContext>, id: i32, channel: i32) {
    start_sample(&mut caller, id, channel, true);
}

/// Stop one channel, or all of them for -1
pub(super) fn stop_sample(mut caller: Caller<'_, WasmContext>, channel: i32) {
    match Channel::from_raw(channel) {
        Some(channel) => caller.data_mut().console.audio.stop_sample(channel),
        None => tracing::debug!(channel, "Ignoring invalid sample channel"),
    }
}
