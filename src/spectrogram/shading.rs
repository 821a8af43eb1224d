//! CPU mirror of the spectrogram shader math.
//!
//! `spectrogram.wgsl` evaluates the same functions per vertex and per
//! fragment; keeping them here lets the mapping be checked without a GPU.

use std::f32::consts::PI;

/// Base of the power mapping from texture coordinate to frequency column
pub const FREQUENCY_WARP_BASE: f32 = 256.0;

/// Non-linear frequency column for normalized coordinate `u` in [0, 1]
///
/// `256^(u - 1)`: u = 1 reads the top bin, u = 0 reads 1/256 of the way in,
/// so low bins are stretched across most of the mesh width.
pub fn frequency_column(u: f32) -> f32 {
    FREQUENCY_WARP_BASE.powf(u - 1.0)
}

/// Standard HSV → RGB with six 60° sectors
///
/// Hue is taken modulo 360, so 360° and 0° give the same color.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let chroma = value * saturation;
    let sector = (hue / 60.0).rem_euclid(6.0);
    let x = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());

    match sector as u32 {
        0 => [chroma, x, 0.0],
        1 => [x, chroma, 0.0],
        2 => [0.0, chroma, x],
        3 => [0.0, x, chroma],
        4 => [x, 0.0, chroma],
        _ => [chroma, 0.0, x],
    }
}

/// Hue for a displaced vertex height: 360° at rest, sweeping down as it rises
pub fn height_to_hue(displaced_y: f32, vertical_scale: f32) -> f32 {
    360.0 - (displaced_y / vertical_scale) * 360.0
}

/// Displaced vertex height for a sampled intensity `k` in [0, 1]
pub fn displaced_height(base_y: f32, k: f32, vertical_scale: f32) -> f32 {
    base_y + vertical_scale * k
}

/// Soft horizon fade along the time axis: `cos((1 - v) * π/2)^0.5`
///
/// 0 at v = 0, 1 at v = 1. The cosine is clamped at 0 so rounding near
/// v = 0 cannot produce NaN.
pub fn edge_fade(v: f32) -> f32 {
    ((1.0 - v) * 0.5 * PI).cos().max(0.0).sqrt()
}

/// Additive composite of faded intensity × color onto the background
pub fn composite(background: [f32; 4], color: [f32; 3], k: f32, v: f32) -> [f32; 4] {
    let k = k * edge_fade(v);
    [
        background[0] + k * color[0],
        background[1] + k * color[1],
        background[2] + k * color[2],
        background[3] + 1.0,
    ]
}
