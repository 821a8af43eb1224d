//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable constants live here with:
//! - Units (degrees, milliseconds, world units, etc.)
//! - The reference value as the `Default`
//! - Validation where a bad value would break an invariant

mod audio;
mod camera;
mod mesh;
mod render;

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig};
pub use camera::CameraRig;
pub use mesh::MeshParams;
pub use render::{RenderConfig, TextureWriteStrategy};
