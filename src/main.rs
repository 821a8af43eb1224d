//! Spectroscape - live audio-reactive 3D spectrogram
//!
//! A scrolling height field whose elevation and color follow the spectrum
//! of the microphone or a synthesized instrument tone.
//!
//! Controls: Space start/stop, M microphone, 1-8 instruments, Esc quit.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use spectroscape::audio::{CpalSourceFactory, Instrument, SourceSelection};
use spectroscape::cli::Args;
use spectroscape::params::AnalyserConfig;
use spectroscape::rendering::WgpuContext;
use spectroscape::session::{Session, SessionConfig};

/// Main application state
struct App {
    // Configuration
    session_config: SessionConfig,
    analyser_config: AnalyserConfig,
    autostart: bool,

    // Window and session
    window: Option<Arc<Window>>,
    session: Option<Session<WgpuContext, CpalSourceFactory>>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(session_config: SessionConfig, analyser_config: AnalyserConfig, autostart: bool) -> Self {
        Self {
            session_config,
            analyser_config,
            autostart,
            window: None,
            session: None,
            start_time: Instant::now(),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn toggle_recording(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_recording() {
            session.stop();
        } else if let Err(e) = session.start() {
            log::error!("Could not start recording: {}", e);
        }
        self.request_redraw();
    }

    fn select(&mut self, selection: SourceSelection) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.select(selection) {
            log::error!("Could not select {}: {}", selection, e);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let time_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        if let Err(e) = session.frame(time_ms) {
            log::error!("Render error: {}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Only a recording session keeps frames coming
        if self.session.as_ref().is_some_and(|s| s.is_recording()) {
            self.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Spectroscape")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.session_config.render.window_width,
                self.session_config.render.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let graphics = match pollster::block_on(WgpuContext::new(Arc::clone(&window))) {
            Ok(graphics) => graphics,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let factory = match CpalSourceFactory::new(self.analyser_config.clone()) {
            Ok(factory) => factory,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let mut session = Session::new(graphics, factory, self.session_config.clone());
        if self.autostart {
            if let Err(e) = session.start() {
                log::error!("Could not start recording: {}", e);
            }
        }

        log::info!("Spectroscape is running: Space start/stop, M microphone, 1-8 instruments, Esc quit");

        self.window = Some(window);
        self.session = Some(session);
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.session = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => {
                    self.session = None;
                    event_loop.exit();
                }
                KeyCode::Space => self.toggle_recording(),
                KeyCode::KeyM => self.select(SourceSelection::Microphone),
                other => {
                    if let Some(instrument) = instrument_for_key(other) {
                        self.select(SourceSelection::Instrument(instrument));
                    }
                }
            },
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

/// Digit keys 1-8 pick catalog entries in order
fn instrument_for_key(code: KeyCode) -> Option<Instrument> {
    let index = match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        _ => return None,
    };
    Instrument::ALL.get(index).copied()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let session_config = match args.session_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };
    let analyser_config = args.analyser_config();
    if let Err(e) = analyser_config.validate() {
        log::error!("Invalid FFT config: {}", e);
        std::process::exit(2);
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(session_config, analyser_config, args.autostart);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
