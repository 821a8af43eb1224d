//! Spectroscape library - live audio-reactive 3D spectrogram

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod params;
pub mod render_loop;
pub mod rendering;
pub mod session;
pub mod spectrogram;

#[cfg(test)]
mod testing;
