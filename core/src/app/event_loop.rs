//! Window application driving the runtime
//!
//! winit delivers input through [`ApplicationHandler`]; events are queued on
//! the [`WindowFrontend`] and drained by the scheduler on every redraw, which
//! runs exactly one tick.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use super::config::{Config, VideoConfig};
use super::presenter::{Presenter, window_scale};
use crate::assets::{GamePaths, load_sprite_sheet};
use crate::audio::{AudioBank, RodioAudio};
use crate::console::{Audio, NullAudio, VIEW_HEIGHT, VIEW_WIDTH};
use crate::context::ConsoleContext;
use crate::export::GifExporter;
use crate::framebuffer::Surface;
#[cfg(feature = "gamepad")]
use crate::input::GamepadPoller;
use crate::input::GamepadSnapshot;
use crate::runtime::{Frontend, HostEvent, Runtime, TickOutcome};
use crate::save_store::SaveStore;
use crate::wasm::{GameInstance, WasmEngine};

/// What to run and how
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the game's `.wasm` file
    pub game: PathBuf,
    pub config: Config,
}

/// Platform side of the scheduler for a real window
struct WindowFrontend {
    presenter: Presenter,
    events: Vec<HostEvent>,
    #[cfg(feature = "gamepad")]
    gamepad: GamepadPoller,
}

impl WindowFrontend {
    fn new(presenter: Presenter) -> Self {
        Self {
            presenter,
            events: Vec::new(),
            #[cfg(feature = "gamepad")]
            gamepad: GamepadPoller::new(),
        }
    }

    fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }
}

impl Frontend for WindowFrontend {
    fn drain_events(&mut self, out: &mut Vec<HostEvent>) {
        out.append(&mut self.events);
    }

    #[cfg(feature = "gamepad")]
    fn poll_controller(&mut self) -> Option<GamepadSnapshot> {
        self.gamepad.poll()
    }

    #[cfg(not(feature = "gamepad"))]
    fn poll_controller(&mut self) -> Option<GamepadSnapshot> {
        None
    }

    fn present(&mut self, frame: &Surface) -> Result<()> {
        self.presenter.present(frame)
    }

    fn vsync(&self) -> bool {
        self.presenter.vsync()
    }
}

type GameRuntime = Runtime<GameInstance, GifExporter>;

struct App {
    title: String,
    video: VideoConfig,
    runtime: GameRuntime,
    frontend: Option<WindowFrontend>,
    /// First fatal error; reported once the event loop returns
    error: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{:#}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn create_frontend(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowFrontend> {
        let monitor = event_loop.primary_monitor().map(|m| m.size());
        let mode = self.video.display_mode;
        let scale = window_scale(monitor, mode, self.video.scale);

        let mut attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(VIEW_WIDTH * scale, VIEW_HEIGHT * scale))
            .with_min_inner_size(PhysicalSize::new(VIEW_WIDTH, VIEW_HEIGHT));
        if self.video.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        let presenter = Presenter::new(Arc::clone(&window), mode, scale)?;
        Ok(WindowFrontend::new(presenter))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.frontend.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut frontend = match self.create_frontend(event_loop) {
            Ok(frontend) => frontend,
            Err(e) => return self.fail(event_loop, e),
        };
        if let Err(e) = self.runtime.start(&mut frontend) {
            return self.fail(event_loop, e.into());
        }
        frontend.presenter.window().request_redraw();
        self.frontend = Some(frontend);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(frontend) = self.frontend.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                frontend.push(HostEvent::CloseRequested);
            }
            WindowEvent::Focused(false) => frontend.push(HostEvent::FocusLost),
            WindowEvent::Resized(size) => frontend.presenter.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    frontend.push(HostEvent::Key {
                        code,
                        pressed: event.state.is_pressed(),
                        repeat: event.repeat,
                    });
                }
            }
            WindowEvent::RedrawRequested => match self.runtime.tick(frontend) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Quit) => event_loop.exit(),
                Err(e) => self.fail(event_loop, e.into()),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(frontend) = &self.frontend {
            frontend.presenter.window().request_redraw();
        }
    }
}

fn open_audio(paths: &GamePaths, config: &Config) -> Box<dyn Audio> {
    if !config.audio.enabled {
        tracing::info!("Audio disabled");
        return Box::new(NullAudio);
    }
    let bank = AudioBank::load(paths);
    match RodioAudio::new(bank, config.audio.master_volume) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            tracing::warn!("No audio device, continuing silently: {}", e);
            Box::new(NullAudio)
        }
    }
}

/// Load a game and run it in a window until it quits.
///
/// Initialization problems and script failures are returned as errors.
pub fn run(options: RunOptions) -> Result<()> {
    let RunOptions { game, config } = options;
    for warning in super::config::validate_keybindings(&config) {
        tracing::warn!("{}", warning);
    }

    let paths = GamePaths::from_game_path(game)?;
    let bytes = paths.read_game()?;
    let sprites = load_sprite_sheet(&paths.sprite_sheet())?;
    let audio = open_audio(&paths, &config);
    let saves = SaveStore::new(paths.save_file());
    tracing::info!("Loading {}", paths.game().display());

    let console = ConsoleContext::new(sprites, Some(saves), audio);
    let engine = WasmEngine::new();
    let instance = GameInstance::load(&engine, &bytes, console)?;

    let runtime = Runtime::new(instance, GifExporter::default(), config.runtime_config());
    let mut app = App {
        title: format!("tinybox - {}", paths.name()),
        video: config.video.clone(),
        runtime,
        frontend: None,
        error: None,
    };

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
