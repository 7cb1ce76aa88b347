//! Fixed-timestep frame scheduler
//!
//! One [`Runtime::tick`] is one 1/60 s frame: drain platform events, update
//! the input sources, run the game's `step`, capture, present, average the
//! frame rate and sleep off the rest of the budget.

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::capture::{CaptureRing, PushOutcome, save_screenshot};
use crate::console::{ButtonState, VIEW_HEIGHT, VIEW_WIDTH};
use crate::export::FrameExporter;
use crate::input::{ControllerSource, KeyboardSource};
use crate::script::{ScriptError, ScriptHost};

mod config;
mod frontend;

#[cfg(test)]
mod tests;

pub use config::{Hotkeys, RuntimeConfig};
pub use frontend::{Frontend, HostEvent};

/// Ticks between frame rate recomputations
pub const FPS_WINDOW: u32 = 60;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Whether the loop should keep going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Average frame rate over fixed windows of ticks
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: u32,
    ticks: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new(window: u32, now: Instant) -> Self {
        Self {
            window: window.max(1),
            ticks: 0,
            window_start: now,
        }
    }

    /// Count one tick; returns the new average once per window
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.ticks += 1;
        if self.ticks < self.window {
            return None;
        }
        let elapsed = now.duration_since(self.window_start).as_secs_f32();
        let fps = if elapsed > 0.0 {
            self.ticks as f32 / elapsed
        } else {
            0.0
        };
        self.ticks = 0;
        self.window_start = now;
        Some(fps)
    }
}

/// Drives one loaded game
pub struct Runtime<S: ScriptHost, E: FrameExporter> {
    config: RuntimeConfig,
    script: S,
    exporter: E,
    keyboard: KeyboardSource,
    controller: ControllerSource,
    ring: CaptureRing,
    fps: FpsCounter,
    events: Vec<HostEvent>,
    tick_duration: Duration,
    ticks: u64,
}

impl<S: ScriptHost, E: FrameExporter> Runtime<S, E> {
    pub fn new(script: S, exporter: E, config: RuntimeConfig) -> Self {
        let ring = CaptureRing::new(config.capture_frames, VIEW_WIDTH, VIEW_HEIGHT);
        Self::with_ring(script, exporter, config, ring)
    }

    /// Runtime with an explicit capture ring
    pub fn with_ring(script: S, exporter: E, config: RuntimeConfig, ring: CaptureRing) -> Self {
        Self {
            keyboard: KeyboardSource::new(),
            controller: ControllerSource::new(config.input.stick_deadzone),
            ring,
            fps: FpsCounter::new(FPS_WINDOW, Instant::now()),
            events: Vec::new(),
            tick_duration: config.tick_duration(),
            ticks: 0,
            config,
            script,
            exporter,
        }
    }

    /// Show a blank frame and run the game's `init`
    pub fn start(&mut self, frontend: &mut dyn Frontend) -> Result<(), RuntimeError> {
        if let Err(e) = frontend.present(&self.script.context().framebuffer) {
            tracing::warn!("Failed to present initial frame: {:#}", e);
        }
        self.script.init()?;
        self.fps = FpsCounter::new(FPS_WINDOW, Instant::now());
        tracing::info!("Game initialized");
        Ok(())
    }

    /// Run one frame
    pub fn tick(&mut self, frontend: &mut dyn Frontend) -> Result<TickOutcome, RuntimeError> {
        let tick_start = Instant::now();

        let mut events = std::mem::take(&mut self.events);
        frontend.drain_events(&mut events);
        let mut close = false;
        let mut screenshot = false;
        for event in events.drain(..) {
            match event {
                HostEvent::CloseRequested => close = true,
                HostEvent::FocusLost => self.keyboard.reset(),
                HostEvent::Key { repeat: true, .. } => {}
                HostEvent::Key {
                    code,
                    pressed,
                    repeat: false,
                } => {
                    let hotkeys = self.config.hotkeys;
                    if pressed && code == hotkeys.quit {
                        close = true;
                    } else if pressed && code == hotkeys.screenshot {
                        screenshot = true;
                    } else if pressed && code == hotkeys.record {
                        self.ring.arm();
                    } else if let Some(button) = self.config.input.keyboard.button_for(code) {
                        if pressed {
                            self.keyboard.press(button);
                        } else {
                            self.keyboard.release(button);
                        }
                    }
                }
            }
        }
        self.events = events;
        self.keyboard.latch();

        let snapshot = frontend.poll_controller();
        self.controller.update(snapshot.as_ref());

        self.script
            .context_mut()
            .input
            .merge(&[&self.keyboard, &self.controller]);

        let step_start = Instant::now();
        self.script.step()?;
        let step_time = step_start.elapsed();
        if step_time > self.config.cpu_budget {
            tracing::warn!(
                "step() took {:?}, exceeds budget of {:?}",
                step_time,
                self.config.cpu_budget
            );
        }

        if self.controller.select() == ButtonState::JustPressed {
            self.ring.arm();
        }
        let frame = &self.script.context().framebuffer;
        if screenshot && let Err(e) = save_screenshot(frame, &self.config.screenshot_path) {
            tracing::error!("Screenshot failed: {}", e);
        }
        match self.ring.push_frame(frame, &mut self.exporter) {
            Ok(PushOutcome::Flushed { frames }) => {
                tracing::info!("Exported {} frames", frames);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Capture failed: {}", e),
        }

        if let Err(e) = frontend.present(frame) {
            tracing::warn!("Failed to present frame: {:#}", e);
        }

        self.ticks += 1;
        if let Some(fps) = self.fps.tick(Instant::now()) {
            self.script.context_mut().average_fps = fps;
        }

        if !frontend.vsync() {
            let elapsed = tick_start.elapsed();
            if elapsed < self.tick_duration {
                thread::sleep(self.tick_duration - elapsed);
            }
        }

        if close || self.script.context().quit_requested {
            tracing::info!("Stopping after {} ticks", self.ticks);
            return Ok(TickOutcome::Quit);
        }
        Ok(TickOutcome::Continue)
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn script_mut(&mut self) -> &mut S {
        &mut self.script
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn ring(&self) -> &CaptureRing {
        &self.ring
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
