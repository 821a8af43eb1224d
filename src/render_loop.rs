//! Per-frame spectrogram update: sample → texture → scroll → camera → draw.

use crate::audio::FrequencySource;
use crate::camera::CameraSystem;
use crate::error::RenderError;
use crate::params::{CameraRig, RenderConfig};
use crate::rendering::{GraphicsContext, SpectrogramUniforms};
use crate::spectrogram::{FrequencyTextures, ScrollOffset, TextureTarget};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Loop is stopped; nothing touched
    Inactive,
    /// No sample available yet; loop stays armed
    Skipped,
    Drawn,
}

/// Render loop state for one session
///
/// A session drops its loop on stop. The `active` flag guards callers that
/// drive a `RenderLoop` directly and keep it around after stopping it.
pub struct RenderLoop {
    scroll: ScrollOffset,
    camera: CameraSystem,
    textures: FrequencyTextures,
    vertical_scale: f32,
    background_color: [f32; 4],
    active: bool,
}

impl RenderLoop {
    pub fn new(config: &RenderConfig, rig: CameraRig, viewport: (u32, u32)) -> Self {
        Self {
            scroll: ScrollOffset::new(config.scroll_step),
            camera: CameraSystem::new(rig, config, viewport),
            textures: FrequencyTextures::new(
                config.texture_size,
                config.fragment_write,
                config.vertex_write,
            ),
            vertical_scale: config.vertical_scale,
            background_color: config.background_color,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.value()
    }

    pub fn textures(&self) -> &FrequencyTextures {
        &self.textures
    }

    pub fn camera(&self) -> &CameraSystem {
        &self.camera
    }

    /// Run one frame against `resources`
    ///
    /// The sample is encoded at the row the advanced offset will read, so
    /// texture content and the offset drawn with always agree.
    pub fn tick<G: GraphicsContext>(
        &mut self,
        source: Option<&mut (dyn FrequencySource + '_)>,
        graphics: &mut G,
        resources: &G::Resources,
        time_ms: f64,
    ) -> Result<TickOutcome, RenderError> {
        if !self.active {
            return Ok(TickOutcome::Inactive);
        }

        let Some(sample) = source.and_then(|s| s.read()) else {
            return Ok(TickOutcome::Skipped);
        };
        if sample.is_empty() {
            return Ok(TickOutcome::Skipped);
        }

        let size = self.textures.fragment.size();
        let head = ScrollOffset::head_row(self.scroll.peek_next(), size);
        self.textures.write(sample, head);
        let offset = self.scroll.advance();

        for target in [TextureTarget::Fragment, TextureTarget::Vertex] {
            let texture = self.textures.get_mut(target);
            for rows in texture.take_dirty_rows() {
                graphics.upload_rows(resources, target, texture, rows);
            }
        }

        let (width, height) = graphics.viewport();
        self.camera.set_viewport(width, height);

        let uniforms = SpectrogramUniforms {
            world_view_projection: self.camera.world_view_projection(time_ms).to_cols_array_2d(),
            background_color: self.background_color,
            vertex_y_offset: offset,
            y_offset: offset,
            vertical_scale: self.vertical_scale,
            _padding: 0.0,
        };
        graphics.draw(resources, &uniforms)?;

        Ok(TickOutcome::Drawn)
    }

    /// Deactivate; repeated calls are no-ops
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            log::debug!("Render loop stopped at offset {:.3}", self.scroll.value());
        }
    }

    /// Update the cached projection for a new viewport
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }
}
