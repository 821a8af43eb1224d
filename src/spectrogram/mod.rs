//! Spectrogram geometry and frequency history.
//!
//! The mesh is a static height field; all per-frame motion comes from the
//! frequency textures and the scroll offset the shaders read them with.

mod mesh;
mod scroll;
pub mod shading;
mod texture;

use bytemuck::{Pod, Zeroable};

// Re-export public types
pub use mesh::SpectrogramMesh;
pub use scroll::ScrollOffset;
pub use texture::{encode_row, FrequencyTexture, FrequencyTextures, TextureTarget};

/// Vertex data for the spectrogram mesh (position + texture coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        // Vertex attribute offsets in the pipeline assume 12 + 8 bytes
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }
}
