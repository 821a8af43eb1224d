//! Instrument catalog and tone synthesis.
//!
//! Each instrument is a single continuous oscillator rendered by a Glicol
//! program. The tone is played on the default output device and analysed
//! exactly like microphone input.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use glicol::Engine;

use super::fft::{AnalysisThread, SampleBuffer};
use super::{FrequencySource, SourceSelection};
use crate::error::SourceError;
use crate::params::{audio_constants::BLOCK_SIZE, AnalyserConfig};

/// Output gain applied inside every program
const TONE_GAIN: f32 = 0.25;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Square,
}

impl Waveform {
    fn glicol_node(&self) -> &'static str {
        match self {
            Self::Sine => "sin",
            Self::Sawtooth => "saw",
            Self::Square => "squ",
        }
    }
}

/// Sinusoidal frequency modulation around the base frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub rate_hz: f32,
    pub depth_hz: f32,
}

/// Fixed instrument catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Flute,
    Harp,
    Whistle,
    Trombone,
    Drums,
    Birds,
    Computer,
    WineGlass,
}

impl Instrument {
    /// Catalog order, as presented to the user
    pub const ALL: [Instrument; 8] = [
        Self::Flute,
        Self::Harp,
        Self::Whistle,
        Self::Trombone,
        Self::Drums,
        Self::Birds,
        Self::Computer,
        Self::WineGlass,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Flute => "flute",
            Self::Harp => "harp",
            Self::Whistle => "whistle",
            Self::Trombone => "trombone",
            Self::Drums => "drums",
            Self::Birds => "birds",
            Self::Computer => "computer",
            Self::WineGlass => "wine",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Flute => "Flute",
            Self::Harp => "Harp",
            Self::Whistle => "Whistle",
            Self::Trombone => "Trombone",
            Self::Drums => "Drums",
            Self::Birds => "Birds",
            Self::Computer => "Computer",
            Self::WineGlass => "Wine Glass",
        }
    }

    pub fn waveform(&self) -> Waveform {
        match self {
            Self::Drums => Waveform::Sawtooth,
            Self::Computer => Waveform::Square,
            _ => Waveform::Sine,
        }
    }

    pub fn base_frequency_hz(&self) -> f32 {
        match self {
            Self::Flute => 523.25,
            Self::Harp => 261.63,
            Self::Whistle => 1046.5,
            Self::Trombone => 146.83,
            Self::Drums => 80.0,
            Self::Birds => 800.0,
            Self::Computer => 440.0,
            Self::WineGlass => 1000.0,
        }
    }

    pub fn modulation(&self) -> Option<Modulation> {
        match self {
            Self::Birds => Some(Modulation {
                rate_hz: 5.0,
                depth_hz: 50.0,
            }),
            _ => None,
        }
    }

    /// Look up a catalog entry by id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.id() == id)
    }

    /// Glicol program rendering this instrument on output `o`
    pub fn glicol_code(&self) -> String {
        let node = self.waveform().glicol_node();
        match self.modulation() {
            Some(m) => format!(
                "~mod: sin {} >> mul {} >> add {}\no: {} ~mod >> mul {}",
                m.rate_hz,
                m.depth_hz,
                self.base_frequency_hz(),
                node,
                TONE_GAIN
            ),
            None => format!(
                "o: {} {} >> mul {}",
                node,
                self.base_frequency_hz(),
                TONE_GAIN
            ),
        }
    }
}

/// Pulls fixed-size blocks from the engine and hands out single samples
struct BlockReader {
    engine: Engine<BLOCK_SIZE>,
    block: [f32; BLOCK_SIZE],
    position: usize,
}

impl BlockReader {
    fn next_sample(&mut self) -> f32 {
        if self.position == BLOCK_SIZE {
            let (buffers, _) = self.engine.next_block(vec![]);
            for (i, slot) in self.block.iter_mut().enumerate() {
                *slot = buffers[0][i];
            }
            self.position = 0;
        }
        let sample = self.block[self.position];
        self.position += 1;
        sample
    }
}

/// A playing instrument tone
pub struct ToneSource {
    instrument: Instrument,
    stream: Option<cpal::Stream>,
    analysis: AnalysisThread,
    sample_count: usize,
}

impl ToneSource {
    /// Start the instrument on the default output device
    pub fn start(instrument: Instrument, config: AnalyserConfig) -> Result<Self, SourceError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SourceError::NoDevice("output"))?;

        let supported = device
            .default_output_config()
            .map_err(|e| SourceError::Device(format!("output config: {}", e)))?;
        let sample_rate = supported.sample_rate().0;

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(&instrument.glicol_code());
        engine
            .update()
            .map_err(|e| SourceError::Synthesis(format!("{:?}", e)))?;

        log::info!(
            "Instrument {} ({} Hz) on {} @ {}Hz",
            instrument.display_name(),
            instrument.base_frequency_hz(),
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate
        );

        let buffer = SampleBuffer::new(config.fft_size);
        let reader = BlockReader {
            engine,
            block: [0.0; BLOCK_SIZE],
            position: BLOCK_SIZE,
        };
        let stream_config: cpal::StreamConfig = supported.config();

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_output::<f32>(&device, &stream_config, reader, buffer.clone()),
            SampleFormat::I16 => build_output::<i16>(&device, &stream_config, reader, buffer.clone()),
            SampleFormat::U16 => build_output::<u16>(&device, &stream_config, reader, buffer.clone()),
            other => {
                return Err(SourceError::Device(format!(
                    "unsupported output sample format {:?}",
                    other
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| SourceError::Device(format!("start output stream: {}", e)))?;

        let sample_count = config.sample_count();
        Ok(Self {
            instrument,
            stream: Some(stream),
            analysis: AnalysisThread::spawn(config, buffer),
            sample_count,
        })
    }
}

fn build_output<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut reader: BlockReader,
    buffer: SampleBuffer,
) -> Result<cpal::Stream, SourceError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    let mut mono = Vec::with_capacity(4096);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                fill_frames(data, channels, || reader.next_sample(), &mut mono);
                buffer.push(mono.iter().copied());
            },
            |err| log::error!("Output stream error: {}", err),
            None,
        )
        .map_err(|e| SourceError::Device(format!("build output stream: {}", e)))
}

/// Write one limited sample to every channel of each frame, keeping the mono copy
fn fill_frames<T>(data: &mut [T], channels: usize, mut next: impl FnMut() -> f32, mono: &mut Vec<f32>)
where
    T: Sample + FromSample<f32>,
{
    mono.clear();
    for frame in data.chunks_mut(channels) {
        // Safety limiter: hard clip to ±0.5
        let sample = next().clamp(-0.5, 0.5);
        frame.fill(T::from_sample(sample));
        mono.push(sample);
    }
}

impl FrequencySource for ToneSource {
    fn selection(&self) -> SourceSelection {
        SourceSelection::Instrument(self.instrument)
    }

    fn sample_count(&self) -> usize {
        self.sample_count
    }

    fn read(&mut self) -> Option<&[u8]> {
        self.analysis.latest()
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::debug!("Ignoring error pausing output stream: {}", e);
            }
            log::info!("Instrument {} stopped", self.instrument.display_name());
        }
        self.analysis.stop();
    }
}

impl Drop for ToneSource {
    fn drop(&mut self) {
        self.stop();
    }
}
