//! Camera rig configuration.

/// Fixed camera rig with a time-driven yaw sway
///
/// The model-view matrix is `T(translation) * Rz(roll) * Ry(yaw) * Rx(pitch)`,
/// with `yaw = yaw_base + yaw_sway * sin(time_ms * sway_rate_per_ms)`.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Rotation about X (degrees)
    pub pitch_degrees: f32,

    /// Rotation about Z (degrees)
    pub roll_degrees: f32,

    /// Yaw around which the sway oscillates (degrees)
    pub yaw_base_degrees: f32,

    /// Sway amplitude (degrees, ±)
    pub yaw_sway_degrees: f32,

    /// Sway phase rate (radians per millisecond)
    /// 0.0005 = one full sway every ~12.6 s
    pub sway_rate_per_ms: f64,

    /// Translation applied after rotation (world units)
    /// Pulls the mesh back and down from the eye
    pub translation: [f32; 3],
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            pitch_degrees: -180.0,
            roll_degrees: 90.0,
            yaw_base_degrees: 270.0,
            yaw_sway_degrees: 30.0,
            sway_rate_per_ms: 0.0005,
            translation: [0.0, -2.0, -9.0],
        }
    }
}
