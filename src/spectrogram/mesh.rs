//! Static height-field grid for the spectrogram.

use super::Vertex;
use crate::params::MeshParams;

/// Immutable W×H grid of vertices on the XZ plane with its triangulation
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SpectrogramMesh {
    /// Generate the grid for the given shape
    ///
    /// Vertex (x, z) sits at `extent * (x - W/2) / W` along X and
    /// `extent * (z - H/2) / H` along Z with y = 0; texture coordinates span
    /// [0, 1] on both axes. Grids narrower than 2 vertices have no cells.
    pub fn new(params: &MeshParams) -> Self {
        let width = params.width as usize;
        let height = params.height as usize;
        let extent = params.extent;

        let mut vertices = Vec::with_capacity(width * height);
        let mut indices =
            Vec::with_capacity(6 * width.saturating_sub(1) * height.saturating_sub(1));

        // Row-major: z selects the row, x the column
        for z in 0..height {
            for x in 0..width {
                let x_pos = extent * (x as f32 - width as f32 / 2.0) / width as f32;
                let z_pos = extent * (z as f32 - height as f32 / 2.0) / height as f32;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    tex_coord: [normalized(x, width), normalized(z, height)],
                });
            }
        }

        // Two triangles per cell, same winding for every cell
        for z in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                let top_left = (z * width + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = top_left + width as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    top_right,
                    bottom_right,
                    top_left,
                    bottom_right,
                    bottom_left,
                ]);
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

fn normalized(index: usize, count: usize) -> f32 {
    if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_counts() {
        let params = MeshParams::default();
        let mesh = SpectrogramMesh::new(&params);

        assert_eq!(mesh.vertices.len(), 128 * 128);
        assert_eq!(mesh.indices.len(), 6 * 127 * 127);
        assert_eq!(mesh.index_count(), 6 * 127 * 127);
    }

    #[test]
    fn test_mesh_generation_is_deterministic() {
        let params = MeshParams {
            width: 17,
            height: 9,
            extent: 3.0,
        };

        let first = SpectrogramMesh::new(&params);
        let second = SpectrogramMesh::new(&params);

        assert_eq!(first, second);
        assert_eq!(first.indices.len(), 6 * 16 * 8);
    }

    #[test]
    fn test_vertex_positions_and_tex_coords() {
        let params = MeshParams::default();
        let mesh = SpectrogramMesh::new(&params);

        let first = mesh.vertices[0];
        assert_eq!(first.position, [-4.75, 0.0, -4.75]);
        assert_eq!(first.tex_coord, [0.0, 0.0]);

        let last = mesh.vertices[mesh.vertices.len() - 1];
        let expected = 9.5 * (127.0 - 64.0) / 128.0;
        assert!((last.position[0] - expected).abs() < 1e-6);
        assert!((last.position[2] - expected).abs() < 1e-6);
        assert_eq!(last.tex_coord, [1.0, 1.0]);

        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_cells_share_winding() {
        let params = MeshParams {
            width: 3,
            height: 3,
            extent: 1.0,
        };
        let mesh = SpectrogramMesh::new(&params);

        // First cell: corners 0, 1, 3, 4
        assert_eq!(&mesh.indices[..6], &[0, 1, 4, 0, 4, 3]);
        // Last cell: corners 4, 5, 7, 8
        assert_eq!(&mesh.indices[18..], &[4, 5, 8, 4, 8, 7]);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }
}
