//! Platform seam for the scheduler
//!
//! The window application implements [`Frontend`]; tests use a scripted one.

use winit::keyboard::KeyCode;

use crate::framebuffer::Surface;
use crate::input::GamepadSnapshot;

/// Platform event relevant to the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key {
        code: KeyCode,
        pressed: bool,
        /// OS auto-repeat; ignored by the runtime
        repeat: bool,
    },
    CloseRequested,
    /// Keys released while unfocused never arrive, so held keys are dropped
    FocusLost,
}

/// What the scheduler needs from the platform each tick
pub trait Frontend {
    /// Move every event received since the last call into `out`
    fn drain_events(&mut self, out: &mut Vec<HostEvent>);
    /// State of the active controller, if one is attached
    fn poll_controller(&mut self) -> Option<GamepadSnapshot>;
    /// Show the frame buffer scaled to the window
    fn present(&mut self, frame: &Surface) -> anyhow::Result<()>;
    /// Whether presentation already waits for vertical sync
    fn vsync(&self) -> bool;
}
