//! Spectrogram mesh parameters.

/// Height-field grid shape
#[derive(Debug, Clone, PartialEq)]
pub struct MeshParams {
    /// Vertices along X (frequency axis)
    pub width: u32,

    /// Vertices along Z (time axis)
    pub height: u32,

    /// Side length of the grid in world units
    pub extent: f32,
}

impl MeshParams {
    /// Largest grid side whose vertex indices still fit in `u32`
    pub const MAX_SIDE: u32 = 65536;
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            extent: 9.5,
        }
    }
}
