//! Stub collaborators for exercising the render loop and session without
//! a GPU or audio device.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use crate::audio::{FrequencySource, SourceFactory, SourceSelection};
use crate::error::{RenderError, SourceError};
use crate::rendering::{GraphicsContext, SpectrogramUniforms};
use crate::spectrogram::{FrequencyTexture, SpectrogramMesh, TextureTarget};

/// Handle into a [`StubGraphics`] allocation
#[derive(Debug)]
pub struct StubResources {
    pub id: usize,
}

/// Graphics context that counts live allocations and records calls
#[derive(Default)]
pub struct StubGraphics {
    pub live: usize,
    pub allocations: usize,
    pub uploads: Vec<(TextureTarget, Range<u32>)>,
    pub draws: Vec<SpectrogramUniforms>,
    pub clears: usize,
    pub viewport: (u32, u32),
    pub fail_allocate: bool,
}

impl StubGraphics {
    pub fn new() -> Self {
        Self {
            viewport: (900, 550),
            ..Self::default()
        }
    }
}

impl GraphicsContext for StubGraphics {
    type Resources = StubResources;

    fn allocate(
        &mut self,
        _mesh: &SpectrogramMesh,
        _texture_size: u32,
    ) -> Result<StubResources, RenderError> {
        if self.fail_allocate {
            return Err(RenderError::ShaderCompile("stub compile error".into()));
        }
        self.live += 1;
        self.allocations += 1;
        Ok(StubResources {
            id: self.allocations,
        })
    }

    fn upload_rows(
        &mut self,
        _resources: &StubResources,
        target: TextureTarget,
        _texture: &FrequencyTexture,
        rows: Range<u32>,
    ) {
        self.uploads.push((target, rows));
    }

    fn draw(
        &mut self,
        _resources: &StubResources,
        uniforms: &SpectrogramUniforms,
    ) -> Result<(), RenderError> {
        self.draws.push(*uniforms);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn release(&mut self, _resources: StubResources) {
        self.live -= 1;
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

/// Shared record of source lifecycle calls, in order
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Frequency source returning a fixed sample once started
pub struct StubSource {
    selection: SourceSelection,
    sample: Vec<u8>,
    running: bool,
    log: CallLog,
}

impl StubSource {
    pub fn new(selection: SourceSelection, sample: Vec<u8>) -> Self {
        Self {
            selection,
            sample,
            running: true,
            log: CallLog::default(),
        }
    }
}

impl FrequencySource for StubSource {
    fn selection(&self) -> SourceSelection {
        self.selection
    }

    fn sample_count(&self) -> usize {
        self.sample.len()
    }

    fn read(&mut self) -> Option<&[u8]> {
        if self.running && !self.sample.is_empty() {
            Some(&self.sample)
        } else {
            None
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.log.borrow_mut().push(format!("stop {}", self.selection));
        }
    }
}

/// Factory producing [`StubSource`]s and logging start/stop order
#[derive(Default)]
pub struct StubFactory {
    pub log: CallLog,
    pub fail: Option<SourceSelection>,
    pub sample: Vec<u8>,
}

impl StubFactory {
    pub fn new() -> Self {
        Self {
            sample: vec![0, 85, 170, 255],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Sources started and not yet stopped
    pub fn active(&self) -> Vec<String> {
        let mut active = Vec::new();
        for call in self.log.borrow().iter() {
            if let Some(name) = call.strip_prefix("start ") {
                active.push(name.to_string());
            } else if let Some(name) = call.strip_prefix("stop ") {
                active.retain(|a| a != name);
            }
        }
        active
    }
}

impl SourceFactory for StubFactory {
    fn start(
        &mut self,
        selection: SourceSelection,
    ) -> Result<Box<dyn FrequencySource>, SourceError> {
        if self.fail == Some(selection) {
            return Err(SourceError::NoDevice("input"));
        }
        self.log.borrow_mut().push(format!("start {}", selection));
        let mut source = StubSource::new(selection, self.sample.clone());
        source.log = Rc::clone(&self.log);
        Ok(Box::new(source))
    }
}
