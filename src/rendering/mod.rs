//! Rendering: the graphics context contract and its wgpu implementation.

mod context;

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::error::RenderError;
use crate::spectrogram::{FrequencyTexture, SpectrogramMesh, TextureTarget};

pub use context::{SpectrogramResources, WgpuContext};

/// Uniform buffer for the spectrogram shader pair
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpectrogramUniforms {
    pub world_view_projection: [[f32; 4]; 4],
    pub background_color: [f32; 4],
    /// Scroll offset used for the per-vertex lookup
    pub vertex_y_offset: f32,
    /// Scroll offset used for the per-fragment lookup
    pub y_offset: f32,
    pub vertical_scale: f32,
    pub _padding: f32,
}

/// Graphics collaborator the session and render loop drive
///
/// Per-session GPU objects live in [`GraphicsContext::Resources`]: they are
/// created by `allocate` and handed back to `release` when the session ends.
pub trait GraphicsContext {
    type Resources;

    /// Build the shader pipeline, mesh buffers, and both frequency textures
    fn allocate(
        &mut self,
        mesh: &SpectrogramMesh,
        texture_size: u32,
    ) -> Result<Self::Resources, RenderError>;

    /// Copy `rows` of `texture` into the GPU instance named by `target`
    fn upload_rows(
        &mut self,
        resources: &Self::Resources,
        target: TextureTarget,
        texture: &FrequencyTexture,
        rows: Range<u32>,
    );

    /// Draw the whole mesh with the given uniforms
    fn draw(
        &mut self,
        resources: &Self::Resources,
        uniforms: &SpectrogramUniforms,
    ) -> Result<(), RenderError>;

    /// Resize the drawable surface (pixels)
    fn resize(&mut self, width: u32, height: u32);

    /// Current drawable size (pixels)
    fn viewport(&self) -> (u32, u32);

    /// Free everything `allocate` created; never fails
    fn release(&mut self, resources: Self::Resources);

    /// Blank the visualization
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        // mat4 (64) + vec4 (16) + 4 scalars (16)
        assert_eq!(std::mem::size_of::<SpectrogramUniforms>(), 96);
        assert_eq!(std::mem::size_of::<SpectrogramUniforms>() % 16, 0);
    }

    fn shader_module() -> naga::Module {
        naga::front::wgsl::parse_str(include_str!("spectrogram.wgsl"))
            .expect("spectrogram.wgsl should parse")
    }

    #[test]
    fn test_shader_parses_and_validates() {
        let module = shader_module();

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("spectrogram.wgsl should validate");

        let entry_points: Vec<(&str, naga::ShaderStage)> = module
            .entry_points
            .iter()
            .map(|ep| (ep.name.as_str(), ep.stage))
            .collect();
        assert!(entry_points.contains(&("vs_main", naga::ShaderStage::Vertex)));
        assert!(entry_points.contains(&("fs_main", naga::ShaderStage::Fragment)));
    }

    #[test]
    fn test_shader_uniforms_match_cpu_layout() {
        let module = shader_module();

        let span = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { span, .. }) if name == "Uniforms" => {
                    Some(*span)
                }
                _ => None,
            })
            .expect("shader declares a Uniforms struct");

        assert_eq!(span as usize, std::mem::size_of::<SpectrogramUniforms>());
    }

    #[test]
    fn test_shader_bindings_match_bind_group_layout() {
        let module = shader_module();

        let mut bindings: Vec<u32> = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| var.binding.as_ref())
            .inspect(|binding| assert_eq!(binding.group, 0))
            .map(|binding| binding.binding)
            .collect();
        bindings.sort_unstable();

        // uniforms, fragment texture, vertex texture, sampler
        assert_eq!(bindings, vec![0, 1, 2, 3]);
    }
}
