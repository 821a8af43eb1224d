//! Live microphone capture.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};

use super::fft::{AnalysisThread, SampleBuffer};
use super::{FrequencySource, SourceSelection};
use crate::error::SourceError;
use crate::params::AnalyserConfig;

/// Default input device, down-mixed to mono and analysed in the background
pub struct MicrophoneSource {
    stream: Option<cpal::Stream>,
    analysis: AnalysisThread,
    sample_count: usize,
}

impl MicrophoneSource {
    /// Open the default input device and start capturing
    pub fn start(config: AnalyserConfig) -> Result<Self, SourceError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(SourceError::NoDevice("input"))?;

        let supported = device
            .default_input_config()
            .map_err(|e| SourceError::Device(format!("input config: {}", e)))?;

        log::info!(
            "Microphone: {} @ {}Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0,
            supported.channels()
        );

        let buffer = SampleBuffer::new(config.fft_size);
        let stream_config: cpal::StreamConfig = supported.config();

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_input::<f32>(&device, &stream_config, buffer.clone()),
            SampleFormat::I16 => build_input::<i16>(&device, &stream_config, buffer.clone()),
            SampleFormat::U16 => build_input::<u16>(&device, &stream_config, buffer.clone()),
            other => {
                return Err(SourceError::Device(format!(
                    "unsupported input sample format {:?}",
                    other
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| SourceError::Device(format!("start input stream: {}", e)))?;

        let sample_count = config.sample_count();
        Ok(Self {
            stream: Some(stream),
            analysis: AnalysisThread::spawn(config, buffer),
            sample_count,
        })
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: SampleBuffer,
) -> Result<cpal::Stream, SourceError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                buffer.push(data.chunks(channels).map(|frame| {
                    frame.iter().map(|&s| f32::from_sample(s)).sum::<f32>() / frame.len() as f32
                }));
            },
            |err| log::error!("Input stream error: {}", err),
            None,
        )
        .map_err(|e| SourceError::Device(format!("build input stream: {}", e)))
}

impl FrequencySource for MicrophoneSource {
    fn selection(&self) -> SourceSelection {
        SourceSelection::Microphone
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
                log::debug!("Ignoring error pausing input stream: {}", e);
            }
            log::info!("Microphone stopped");
        }
        self.analysis.stop();
    }
}

impl Drop for MicrophoneSource {
    fn drop(&mut self) {
        self.stop();
    }
}
