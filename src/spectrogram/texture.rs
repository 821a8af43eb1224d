//! Frequency texture encoding.
//!
//! Each texture is a square single-channel image used as a rolling history:
//! rows are frames, columns are frequency. The GPU copies are refreshed from
//! the dirty row ranges recorded here.

use std::ops::Range;

use crate::params::TextureWriteStrategy;

/// Nearest-neighbour resample of `sample` (N bins) into `row` (S columns)
///
/// Column `x` takes bin `floor(x * N / S)`. An empty sample writes zeros.
pub fn encode_row(sample: &[u8], row: &mut [u8]) {
    let bins = sample.len();
    let columns = row.len();

    if bins == 0 {
        row.fill(0);
        return;
    }

    for (x, texel) in row.iter_mut().enumerate() {
        *texel = sample[x * bins / columns];
    }
}

/// CPU copy of one S×S frequency texture
#[derive(Debug, Clone)]
pub struct FrequencyTexture {
    size: u32,
    data: Vec<u8>,
    strategy: TextureWriteStrategy,
    /// Row written by the previous frame
    last_row: Option<u32>,
    /// Row ranges changed since the last upload
    dirty: Vec<Range<u32>>,
}

impl FrequencyTexture {
    pub fn new(size: u32, strategy: TextureWriteStrategy) -> Self {
        Self {
            size,
            data: vec![0; size as usize * size as usize],
            strategy,
            last_row: None,
            dirty: Vec::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Full texel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, row: u32) -> &[u8] {
        let width = self.size as usize;
        let start = row as usize * width;
        &self.data[start..start + width]
    }

    /// Encode `sample` so it becomes the newest row at `head_row`
    ///
    /// With [`TextureWriteStrategy::Row`] every row the head moved across since
    /// the previous write gets the sample, so a fractional scroll step never
    /// leaves stale rows behind. Rows outside that span are untouched.
    pub fn write(&mut self, sample: &[u8], head_row: u32) {
        if self.size == 0 {
            return;
        }
        let head_row = head_row % self.size;

        let mut encoded = vec![0; self.size as usize];
        encode_row(sample, &mut encoded);

        match self.strategy {
            TextureWriteStrategy::Fill => {
                for row in 0..self.size {
                    self.copy_row(row, &encoded);
                }
                self.mark_dirty(0..self.size);
            }
            TextureWriteStrategy::Row => {
                let span = match self.last_row {
                    Some(last) if last != head_row => (head_row + self.size - last) % self.size,
                    _ => 1,
                };
                let first = (head_row + self.size + 1 - span) % self.size;

                for i in 0..span {
                    self.copy_row((first + i) % self.size, &encoded);
                }

                if first + span <= self.size {
                    self.mark_dirty(first..first + span);
                } else {
                    self.mark_dirty(first..self.size);
                    self.mark_dirty(0..(first + span) % self.size);
                }
            }
        }

        self.last_row = Some(head_row);
    }

    /// Row ranges to upload since the previous call
    pub fn take_dirty_rows(&mut self) -> Vec<Range<u32>> {
        std::mem::take(&mut self.dirty)
    }

    fn copy_row(&mut self, row: u32, encoded: &[u8]) {
        let width = self.size as usize;
        let start = row as usize * width;
        self.data[start..start + width].copy_from_slice(encoded);
    }

    fn mark_dirty(&mut self, rows: Range<u32>) {
        if rows.is_empty() {
            return;
        }
        // Merge with the previous range when contiguous
        if let Some(last) = self.dirty.last_mut() {
            if last.end == rows.start {
                last.end = rows.end;
                return;
            }
        }
        self.dirty.push(rows);
    }
}

/// Which of the two texture instances a resource refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    /// Sampled per fragment for color intensity
    Fragment,
    /// Sampled per vertex for height displacement
    Vertex,
}

/// The two frequency textures, fed from the same sample every frame
#[derive(Debug, Clone)]
pub struct FrequencyTextures {
    pub fragment: FrequencyTexture,
    pub vertex: FrequencyTexture,
}

impl FrequencyTextures {
    pub fn new(
        size: u32,
        fragment_write: TextureWriteStrategy,
        vertex_write: TextureWriteStrategy,
    ) -> Self {
        Self {
            fragment: FrequencyTexture::new(size, fragment_write),
            vertex: FrequencyTexture::new(size, vertex_write),
        }
    }

    pub fn write(&mut self, sample: &[u8], head_row: u32) {
        self.fragment.write(sample, head_row);
        self.vertex.write(sample, head_row);
    }

    pub fn get_mut(&mut self, target: TextureTarget) -> &mut FrequencyTexture {
        match target {
            TextureTarget::Fragment => &mut self.fragment,
            TextureTarget::Vertex => &mut self.vertex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_identity_when_sizes_match() {
        let sample = [0, 85, 170, 255];
        let mut row = [7u8; 4];

        encode_row(&sample, &mut row);

        assert_eq!(row, [0, 85, 170, 255]);
    }

    #[test]
    fn test_encode_downsamples_nearest_neighbour() {
        let sample: Vec<u8> = (0..8).collect();
        let mut row = [0u8; 4];

        encode_row(&sample, &mut row);

        assert_eq!(row, [0, 2, 4, 6]);
    }

    #[test]
    fn test_encode_upsamples_nearest_neighbour() {
        let sample = [10, 20];
        let mut row = [0u8; 4];

        encode_row(&sample, &mut row);

        assert_eq!(row, [10, 10, 20, 20]);
    }

    #[test]
    fn test_row_write_targets_head_only() {
        let mut texture = FrequencyTexture::new(4, TextureWriteStrategy::Row);

        texture.write(&[0, 85, 170, 255], 2);

        assert_eq!(texture.row(2), &[0, 85, 170, 255]);
        assert_eq!(texture.row(0), &[0, 0, 0, 0]);
        assert_eq!(texture.row(1), &[0, 0, 0, 0]);
        assert_eq!(texture.row(3), &[0, 0, 0, 0]);
        assert_eq!(texture.take_dirty_rows(), vec![2..3]);
        assert!(texture.take_dirty_rows().is_empty());
    }

    #[test]
    fn test_row_write_fills_skipped_rows() {
        let mut texture = FrequencyTexture::new(8, TextureWriteStrategy::Row);

        texture.write(&[1; 8], 1);
        texture.take_dirty_rows();
        texture.write(&[2; 8], 4);

        assert_eq!(texture.row(1), &[1; 8]);
        assert_eq!(texture.row(2), &[2; 8]);
        assert_eq!(texture.row(3), &[2; 8]);
        assert_eq!(texture.row(4), &[2; 8]);
        assert_eq!(texture.row(5), &[0; 8]);
        assert_eq!(texture.take_dirty_rows(), vec![2..5]);
    }

    #[test]
    fn test_row_write_wraps_dirty_ranges() {
        let mut texture = FrequencyTexture::new(8, TextureWriteStrategy::Row);

        texture.write(&[1; 8], 6);
        texture.take_dirty_rows();
        texture.write(&[3; 8], 1);

        assert_eq!(texture.row(7), &[3; 8]);
        assert_eq!(texture.row(0), &[3; 8]);
        assert_eq!(texture.row(1), &[3; 8]);
        assert_eq!(texture.row(6), &[1; 8]);
        assert_eq!(texture.take_dirty_rows(), vec![7..8, 0..2]);
    }

    #[test]
    fn test_repeated_head_rewrites_single_row() {
        let mut texture = FrequencyTexture::new(4, TextureWriteStrategy::Row);

        texture.write(&[1; 4], 3);
        texture.write(&[9; 4], 3);

        assert_eq!(texture.row(3), &[9; 4]);
        assert_eq!(texture.row(2), &[0; 4]);
        assert_eq!(texture.take_dirty_rows(), vec![3..4, 3..4]);
    }

    #[test]
    fn test_fill_write_overwrites_every_row() {
        let mut texture = FrequencyTexture::new(4, TextureWriteStrategy::Fill);

        texture.write(&[0, 85, 170, 255], 1);

        for row in 0..4 {
            assert_eq!(texture.row(row), &[0, 85, 170, 255]);
        }
        assert_eq!(texture.take_dirty_rows(), vec![0..4]);
    }

    #[test]
    fn test_both_instances_receive_the_sample() {
        let mut textures =
            FrequencyTextures::new(4, TextureWriteStrategy::Row, TextureWriteStrategy::Fill);

        textures.write(&[4, 3, 2, 1], 0);

        assert_eq!(textures.fragment.row(0), &[4, 3, 2, 1]);
        assert_eq!(textures.fragment.row(1), &[0, 0, 0, 0]);
        assert_eq!(textures.vertex.row(3), &[4, 3, 2, 1]);
        assert_eq!(
            textures.get_mut(TextureTarget::Vertex).take_dirty_rows(),
            vec![0..4]
        );
    }
}
