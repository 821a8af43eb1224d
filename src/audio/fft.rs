//! Byte-spectrum analysis thread and utilities.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use triple_buffer::TripleBuffer;

use crate::params::AnalyserConfig;

/// Blackman window (α = 0.16) over a window of `size` samples
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let phase = 2.0 * PI * index as f32 / size as f32;
    0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
}

/// Map a linear magnitude onto a byte across `[min_db, max_db]`, clamped
pub fn magnitude_to_byte(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    let db = 20.0 * magnitude.log10();
    if !db.is_finite() || db <= min_db {
        return 0;
    }
    let scaled = 255.0 * (db - min_db) / (max_db - min_db);
    scaled.floor().clamp(0.0, 255.0) as u8
}

/// Windowed FFT producing one byte per bin
pub struct SpectrumAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes from the previous window
    smoothed: Vec<f32>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();

        Self {
            fft,
            window,
            fft_buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.sample_count()],
            config,
        }
    }

    /// Analyse the first `fft_size` samples of `samples` into `out`
    ///
    /// `out` is resized to `fft_size / 2` bins. Missing input samples are
    /// treated as silence.
    pub fn analyse(&mut self, samples: &[f32], out: &mut Vec<u8>) {
        let size = self.config.fft_size;

        for (i, slot) in self.fft_buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.fft_buffer);

        let tau = self.config.smoothing_time_constant;
        out.resize(self.smoothed.len(), 0);

        for ((bin, smoothed), byte) in self
            .fft_buffer
            .iter()
            .zip(self.smoothed.iter_mut())
            .zip(out.iter_mut())
        {
            let magnitude = bin.norm() / size as f32;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            *byte = magnitude_to_byte(
                *smoothed,
                self.config.min_decibels,
                self.config.max_decibels,
            );
        }
    }
}

/// Mono sample accumulator shared between an audio callback and the analyser
#[derive(Clone)]
pub struct SampleBuffer {
    samples: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl SampleBuffer {
    /// Keep at most `window` samples once analysed, `2 * window` between analyses
    pub fn new(window: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::with_capacity(window * 2))),
            capacity: window * 2,
        }
    }

    /// Append samples, discarding the oldest beyond capacity
    pub fn push(&self, samples: impl IntoIterator<Item = f32>) {
        // Poisoned only if the analyser panicked; drop audio rather than panic here
        let Ok(mut buffer) = self.samples.lock() else {
            return;
        };
        buffer.extend(samples);
        if buffer.len() > self.capacity {
            let excess = buffer.len() - self.capacity;
            buffer.drain(0..excess);
        }
    }

    /// Copy the most recent `window` samples into `out`
    ///
    /// Returns false until a full window has been captured.
    pub fn latest_window(&self, window: usize, out: &mut Vec<f32>) -> bool {
        let Ok(mut buffer) = self.samples.lock() else {
            return false;
        };
        if buffer.len() < window {
            return false;
        }
        let excess = buffer.len() - window;
        buffer.drain(0..excess);

        out.clear();
        out.extend_from_slice(&buffer);
        true
    }
}

/// Background analysis thread publishing the latest byte spectrum
///
/// The render loop reads with last-write-wins semantics: no queue, frames
/// may see the same sample twice.
pub struct AnalysisThread {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    output: triple_buffer::Output<Vec<u8>>,
}

impl AnalysisThread {
    /// Spawn FFT analysis thread over `buffer`
    pub fn spawn(config: AnalyserConfig, buffer: SampleBuffer) -> Self {
        // An empty vector means "no window analysed yet"
        let (mut input, output) = TripleBuffer::new(&Vec::new()).split();
        let running = Arc::new(AtomicBool::new(true));
        let running_thread = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let interval = Duration::from_millis(config.update_interval_ms);
            let window = config.fft_size;
            let mut analyser = SpectrumAnalyser::new(config);
            let mut samples = Vec::with_capacity(window);
            let mut spectrum = Vec::with_capacity(window / 2);

            while running_thread.load(Ordering::Acquire) {
                thread::sleep(interval);

                if buffer.latest_window(window, &mut samples) {
                    analyser.analyse(&samples, &mut spectrum);
                    input.write(spectrum.clone());
                }
            }
        });

        Self {
            running,
            handle: Some(handle),
            output,
        }
    }

    /// Latest spectrum sample, if one has been produced
    pub fn latest(&mut self) -> Option<&[u8]> {
        let sample = self.output.read();
        if sample.is_empty() {
            None
        } else {
            Some(sample.as_slice())
        }
    }

    /// Stop and join the thread; later calls do nothing
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::debug!("Analysis thread panicked before shutdown");
            }
        }
    }
}

impl Drop for AnalysisThread {
    fn drop(&mut self) {
        self.stop();
    }
}
