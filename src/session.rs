//! Session state machine: Idle ⇄ Recording.
//!
//! Entering Recording allocates the GPU resources and starts a frequency
//! source; leaving it stops the source and frees everything. At most one
//! source is alive at a time, and a new one starts only after the old one
//! has stopped.

use crate::audio::{FrequencySource, SourceFactory, SourceSelection};
use crate::error::SessionError;
use crate::params::{CameraRig, MeshParams, RenderConfig};
use crate::render_loop::{RenderLoop, TickOutcome};
use crate::rendering::GraphicsContext;
use crate::spectrogram::SpectrogramMesh;

/// Everything a session needs to build its per-recording state
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mesh: MeshParams,
    pub render: RenderConfig,
    pub camera: CameraRig,
    /// Source started on entering Recording
    pub default_source: SourceSelection,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mesh: MeshParams::default(),
            render: RenderConfig::default(),
            camera: CameraRig::default(),
            default_source: SourceSelection::Microphone,
        }
    }
}

enum State<R> {
    Idle,
    Recording(Recording<R>),
}

struct Recording<R> {
    resources: R,
    render_loop: RenderLoop,
    /// `None` after a deselect; the loop stays armed but draws nothing new
    source: Option<Box<dyn FrequencySource>>,
}

/// Owner of the graphics context, source factory, and session lifecycle
pub struct Session<G: GraphicsContext, F: SourceFactory> {
    graphics: G,
    factory: F,
    config: SessionConfig,
    mesh: SpectrogramMesh,
    state: State<G::Resources>,
}

impl<G: GraphicsContext, F: SourceFactory> Session<G, F> {
    pub fn new(graphics: G, factory: F, config: SessionConfig) -> Self {
        let mesh = SpectrogramMesh::new(&config.mesh);
        Self {
            graphics,
            factory,
            config,
            mesh,
            state: State::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, State::Recording(_))
    }

    /// Currently selected source, if recording with one
    pub fn selection(&self) -> Option<SourceSelection> {
        match &self.state {
            State::Recording(recording) => recording.source.as_ref().map(|s| s.selection()),
            State::Idle => None,
        }
    }

    pub fn graphics(&self) -> &G {
        &self.graphics
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Idle → Recording; a no-op while already recording
    ///
    /// On failure nothing stays allocated and the session remains Idle.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_recording() {
            return Ok(());
        }

        let resources = self
            .graphics
            .allocate(&self.mesh, self.config.render.texture_size)?;

        let source = match self.factory.start(self.config.default_source) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Failed to start {}: {}", self.config.default_source, e);
                self.graphics.release(resources);
                return Err(e.into());
            }
        };

        let render_loop = RenderLoop::new(
            &self.config.render,
            self.config.camera.clone(),
            self.graphics.viewport(),
        );

        log::info!(
            "Recording started with {} ({} bins per sample)",
            source.selection(),
            source.sample_count()
        );
        self.state = State::Recording(Recording {
            resources,
            render_loop,
            source: Some(source),
        });
        Ok(())
    }

    /// Switch sources while recording
    ///
    /// The current source is always stopped first. Selecting the source that
    /// is already active deselects it instead of restarting it. Ignored while
    /// Idle.
    pub fn select(&mut self, selection: SourceSelection) -> Result<(), SessionError> {
        let State::Recording(recording) = &mut self.state else {
            log::debug!("Ignoring selection of {} while idle", selection);
            return Ok(());
        };

        let previous = recording.source.take().map(|mut source| {
            source.stop();
            source.selection()
        });

        if previous == Some(selection) {
            log::info!("Deselected {}", selection);
            return Ok(());
        }

        match self.factory.start(selection) {
            Ok(source) => {
                log::info!("Switched source to {}", selection);
                recording.source = Some(source);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to start {}: {}", selection, e);
                Err(e.into())
            }
        }
    }

    /// Recording → Idle; a no-op while Idle
    pub fn stop(&mut self) {
        let State::Recording(mut recording) = std::mem::replace(&mut self.state, State::Idle)
        else {
            return;
        };

        if let Some(mut source) = recording.source.take() {
            source.stop();
        }
        recording.render_loop.stop();
        self.graphics.release(recording.resources);
        self.graphics.clear();
        log::info!("Recording stopped");
    }

    /// Run one render-loop tick; Idle sessions do nothing
    pub fn frame(&mut self, time_ms: f64) -> Result<TickOutcome, SessionError> {
        let State::Recording(recording) = &mut self.state else {
            return Ok(TickOutcome::Inactive);
        };

        let outcome = recording.render_loop.tick(
            recording.source.as_deref_mut(),
            &mut self.graphics,
            &recording.resources,
            time_ms,
        )?;
        Ok(outcome)
    }

    /// Resize the surface and the cached projection
    pub fn resize(&mut self, width: u32, height: u32) {
        self.graphics.resize(width, height);
        if let State::Recording(recording) = &mut self.state {
            recording.render_loop.resize(width, height);
        }
    }
}

impl<G: GraphicsContext, F: SourceFactory> Drop for Session<G, F> {
    fn drop(&mut self) {
        self.stop();
    }
}
