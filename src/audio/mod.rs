//! Frequency sources: live microphone capture and synthesized instrument tones.
//!
//! Both kinds of source feed the same byte-spectrum analyser, which runs on
//! its own thread and publishes the latest spectrum sample for the render
//! loop to pick up.

mod fft;
mod microphone;
mod synthesis;

use crate::error::SourceError;
use crate::params::AnalyserConfig;

// Re-export public types
pub use fft::{AnalysisThread, SampleBuffer, SpectrumAnalyser};
pub use microphone::MicrophoneSource;
pub use synthesis::{Instrument, Modulation, ToneSource, Waveform};

/// Which source a session reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    Microphone,
    Instrument(Instrument),
}

impl std::fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Microphone => write!(f, "microphone"),
            Self::Instrument(instrument) => write!(f, "{}", instrument.id()),
        }
    }
}

/// A started source of spectrum samples
pub trait FrequencySource {
    fn selection(&self) -> SourceSelection;

    /// Bins per sample, fixed for the lifetime of the source
    fn sample_count(&self) -> usize;

    /// Most recent spectrum sample, or `None` before the first analysis window
    fn read(&mut self) -> Option<&[u8]>;

    /// Halt capture or synthesis; safe to call more than once
    fn stop(&mut self);
}

/// Starts frequency sources on demand
pub trait SourceFactory {
    fn start(
        &mut self,
        selection: SourceSelection,
    ) -> Result<Box<dyn FrequencySource>, SourceError>;
}

/// Factory backed by the default cpal host devices
pub struct CpalSourceFactory {
    config: AnalyserConfig,
}

impl CpalSourceFactory {
    pub fn new(config: AnalyserConfig) -> Result<Self, SourceError> {
        config.validate().map_err(SourceError::Device)?;
        Ok(Self { config })
    }
}

impl SourceFactory for CpalSourceFactory {
    fn start(
        &mut self,
        selection: SourceSelection,
    ) -> Result<Box<dyn FrequencySource>, SourceError> {
        match selection {
            SourceSelection::Microphone => {
                Ok(Box::new(MicrophoneSource::start(self.config.clone())?))
            }
            SourceSelection::Instrument(instrument) => {
                Ok(Box::new(ToneSource::start(instrument, self.config.clone())?))
            }
        }
    }
}
