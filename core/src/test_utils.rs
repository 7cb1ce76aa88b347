//! Shared test utilities for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::console::{Audio, Channel};
use crate::context::ConsoleContext;
use crate::export::{ExportError, FrameExporter};
use crate::framebuffer::Surface;
use crate::input::GamepadSnapshot;
use crate::runtime::{Frontend, HostEvent};
use crate::script::{ScriptError, ScriptHost};

// ============================================================================
// Script Host
// ============================================================================

type Entry = Box<dyn FnMut(&mut ConsoleContext) -> Result<(), ScriptError>>;

/// Script host backed by closures over a headless context
pub struct FnScript {
    context: ConsoleContext,
    init: Entry,
    step: Entry,
    pub inits: usize,
    pub steps: usize,
}

impl FnScript {
    pub fn new(step: impl FnMut(&mut ConsoleContext) -> Result<(), ScriptError> + 'static) -> Self {
        Self {
            context: ConsoleContext::headless(),
            init: Box::new(|_| Ok(())),
            step: Box::new(step),
            inits: 0,
            steps: 0,
        }
    }

    /// Script whose `step` does nothing
    pub fn idle() -> Self {
        Self::new(|_| Ok(()))
    }

    pub fn with_init(
        mut self,
        init: impl FnMut(&mut ConsoleContext) -> Result<(), ScriptError> + 'static,
    ) -> Self {
        self.init = Box::new(init);
        self
    }
}

impl ScriptHost for FnScript {
    fn init(&mut self) -> Result<(), ScriptError> {
        self.inits += 1;
        (self.init)(&mut self.context)
    }

    fn step(&mut self) -> Result<(), ScriptError> {
        self.steps += 1;
        (self.step)(&mut self.context)
    }

    fn context(&self) -> &ConsoleContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut ConsoleContext {
        &mut self.context
    }
}

// ============================================================================
// Frontend
// ============================================================================

/// Frontend fed from a queue of per-tick event batches
#[derive(Default)]
pub struct TestFrontend {
    /// Events delivered on successive ticks, one batch per tick
    pub batches: VecDeque<Vec<HostEvent>>,
    /// Controller state reported every tick
    pub controller: Option<GamepadSnapshot>,
    pub presented: usize,
    pub last_frame: Option<Surface>,
    pub fail_present: bool,
}

impl TestFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one tick worth of events
    pub fn push_tick(&mut self, events: Vec<HostEvent>) {
        self.batches.push_back(events);
    }
}

impl Frontend for TestFrontend {
    fn drain_events(&mut self, out: &mut Vec<HostEvent>) {
        if let Some(batch) = self.batches.pop_front() {
            out.extend(batch);
        }
    }

    fn poll_controller(&mut self) -> Option<GamepadSnapshot> {
        self.controller
    }

    fn present(&mut self, frame: &Surface) -> anyhow::Result<()> {
        self.presented += 1;
        if self.fail_present {
            anyhow::bail!("surface lost");
        }
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn vsync(&self) -> bool {
        true
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Exporter that keeps a copy of every flushed ring
#[derive(Default)]
pub struct RecordingExporter {
    pub exports: Vec<Vec<Surface>>,
    pub fail: bool,
}

impl RecordingExporter {
    pub fn failing() -> Self {
        Self {
            exports: Vec::new(),
            fail: true,
        }
    }
}

impl FrameExporter for RecordingExporter {
    fn export(&mut self, slots: &[Surface]) -> Result<usize, ExportError> {
        if self.fail {
            return Err(ExportError::Scratch);
        }
        self.exports.push(slots.to_vec());
        Ok(slots.len() / 2)
    }
}

// ============================================================================
// Audio
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    PlaySong { id: usize, looping: bool },
    StopSong,
    PlaySample { id: usize, channel: Channel, looping: bool },
    StopSample(Channel),
}

/// Audio backend that records calls into a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub calls: Rc<RefCell<Vec<AudioCall>>>,
}

impl Audio for RecordingAudio {
    fn play_song(&mut self, id: usize, looping: bool) {
        self.calls.borrow_mut().push(AudioCall::PlaySong { id, looping });
    }

    fn stop_song(&mut self) {
        self.calls.borrow_mut().push(AudioCall::StopSong);
    }

    fn play_sample(&mut self, id: usize, channel: Channel, looping: bool) {
        self.calls.borrow_mut().push(AudioCall::PlaySample {
            id,
            channel,
            looping,
        });
    }

    fn stop_sample(&mut self, channel: Channel) {
        self.calls.borrow_mut().push(AudioCall::StopSample(channel));
    }
}
