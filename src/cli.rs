//! Command-line argument parsing.

use clap::Parser;

use crate::audio::{Instrument, SourceSelection};
use crate::params::{AnalyserConfig, MeshParams, RenderConfig, TextureWriteStrategy};
use crate::session::SessionConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Spectroscape")]
#[command(about = "Live audio-reactive 3D spectrogram", long_about = None)]
pub struct Args {
    /// FFT window size (power of 2); spectrum samples have half as many bins
    #[arg(long, value_name = "SAMPLES", default_value = "2048")]
    pub fft_size: usize,

    /// Frequency texture side length (texels)
    #[arg(long, value_name = "TEXELS", default_value = "256")]
    pub texture_size: u32,

    /// Mesh grid resolution (vertices per side)
    #[arg(long, value_name = "VERTICES", default_value = "128")]
    pub grid: u32,

    /// Height of a full-scale sample (world units)
    #[arg(long, value_name = "UNITS", default_value = "2.7")]
    pub vertical_scale: f32,

    /// Scroll offset advance per frame (fraction of the texture)
    #[arg(long, value_name = "FRACTION", default_value = "0.005")]
    pub scroll_step: f32,

    /// Initial source: "mic" or an instrument id (flute, harp, whistle,
    /// trombone, drums, birds, computer, wine)
    #[arg(long, value_name = "SOURCE", default_value = "mic")]
    pub source: String,

    /// Start recording immediately instead of waiting for Space
    #[arg(long)]
    pub autostart: bool,

    /// Overwrite every texture row each frame instead of scrolling history
    #[arg(long)]
    pub flat_history: bool,
}

impl Args {
    /// Parse the initial source selection
    pub fn source_selection(&self) -> Result<SourceSelection, String> {
        match self.source.to_lowercase().as_str() {
            "mic" | "microphone" => Ok(SourceSelection::Microphone),
            id => Instrument::from_id(id)
                .map(SourceSelection::Instrument)
                .ok_or_else(|| format!("Unknown source '{}'", id)),
        }
    }

    pub fn analyser_config(&self) -> AnalyserConfig {
        AnalyserConfig {
            fft_size: self.fft_size,
            ..AnalyserConfig::default()
        }
    }

    /// Build session configuration, validating ranges
    pub fn session_config(&self) -> Result<SessionConfig, String> {
        if !(2..=MeshParams::MAX_SIDE).contains(&self.grid) {
            return Err(format!(
                "Grid resolution must be in 2..={}, got {}",
                MeshParams::MAX_SIDE,
                self.grid
            ));
        }
        if !(1..=RenderConfig::MAX_TEXTURE_SIZE).contains(&self.texture_size) {
            return Err(format!(
                "Texture size must be in 1..={}, got {}",
                RenderConfig::MAX_TEXTURE_SIZE,
                self.texture_size
            ));
        }
        if !(self.scroll_step > 0.0 && self.scroll_step < 1.0) {
            return Err(format!(
                "Scroll step must be in (0, 1), got {}",
                self.scroll_step
            ));
        }
        if self.vertical_scale <= 0.0 {
            return Err(format!(
                "Vertical scale must be positive, got {}",
                self.vertical_scale
            ));
        }

        let mut config = SessionConfig {
            default_source: self.source_selection()?,
            ..SessionConfig::default()
        };
        config.mesh.width = self.grid;
        config.mesh.height = self.grid;
        config.render.texture_size = self.texture_size;
        config.render.vertical_scale = self.vertical_scale;
        config.render.scroll_step = self.scroll_step;
        if self.flat_history {
            config.render.fragment_write = TextureWriteStrategy::Fill;
            config.render.vertex_write = TextureWriteStrategy::Fill;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let args = Args::parse_from(["spectroscape"]);
        let config = args.session_config().unwrap();

        assert_eq!(config.default_source, SourceSelection::Microphone);
        assert_eq!(config.mesh.width, 128);
        assert_eq!(config.render.texture_size, 256);
        assert_eq!(config.render.fragment_write, TextureWriteStrategy::Row);
        assert_eq!(args.analyser_config().sample_count(), 1024);
    }

    #[test]
    fn test_instrument_source_and_flat_history() {
        let args = Args::parse_from(["spectroscape", "--source", "birds", "--flat-history"]);
        let config = args.session_config().unwrap();

        assert_eq!(
            config.default_source,
            SourceSelection::Instrument(Instrument::Birds)
        );
        assert_eq!(config.render.vertex_write, TextureWriteStrategy::Fill);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let args = Args::parse_from(["spectroscape", "--source", "kazoo"]);
        assert!(args.session_config().is_err());

        let args = Args::parse_from(["spectroscape", "--grid", "1"]);
        assert!(args.session_config().is_err());

        let args = Args::parse_from(["spectroscape", "--scroll-step", "1.5"]);
        assert!(args.session_config().is_err());
    }

    #[test]
    fn test_size_upper_bounds() {
        let args = Args::parse_from(["spectroscape", "--texture-size", "8192"]);
        assert!(args.session_config().is_ok());
        let args = Args::parse_from(["spectroscape", "--texture-size", "8193"]);
        assert!(args.session_config().is_err());
        let args = Args::parse_from(["spectroscape", "--texture-size", "70000"]);
        assert!(args.session_config().is_err());

        let args = Args::parse_from(["spectroscape", "--grid", "65536"]);
        assert!(args.session_config().is_ok());
        let args = Args::parse_from(["spectroscape", "--grid", "65537"]);
        assert!(args.session_config().is_err());
    }
}
