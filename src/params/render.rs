//! Rendering configuration.

/// How a frequency texture is refreshed from each spectrum sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWriteStrategy {
    /// Write only the rows the scroll head moved across (rolling history)
    #[default]
    Row,

    /// Overwrite every row with the current sample (flat, no history)
    Fill,
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Frequency texture side length (texels, square)
    pub texture_size: u32,

    /// Height of a full-scale (255) sample in world units
    pub vertical_scale: f32,

    /// Scroll offset advance per frame (normalized texture units)
    /// 0.005 = 1.28 rows per frame on a 256 texture
    pub scroll_step: f32,

    /// Linear RGBA the spectrum color is added onto (light tan)
    pub background_color: [f32; 4],

    /// Write strategy for the texture sampled per fragment
    pub fragment_write: TextureWriteStrategy,

    /// Write strategy for the texture sampled per vertex
    pub vertex_write: TextureWriteStrategy,
}

impl RenderConfig {
    /// Largest texture side every wgpu adapter accepts by default (texels)
    pub const MAX_TEXTURE_SIZE: u32 = 8192;
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 900,
            window_height: 550,
            fov_degrees: 55.0,
            near_plane: 1.0,
            far_plane: 100.0,
            texture_size: 256,
            vertical_scale: 2.7,
            scroll_step: 0.005,
            background_color: [0.83, 0.71, 0.63, 1.0],
            fragment_write: TextureWriteStrategy::Row,
            vertex_write: TextureWriteStrategy::Row,
        }
    }
}
