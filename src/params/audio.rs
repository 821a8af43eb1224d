//! Audio analysis configuration and constants.

/// Spectrum analysis configuration (byte spectrum, one value per bin)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2)
    /// Produces `fft_size / 2` bins
    pub fft_size: usize,

    /// Analysis update interval (milliseconds)
    /// 16 ms ≈ one analysis per display refresh at 60 Hz
    pub update_interval_ms: u64,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Exponential smoothing between consecutive windows, in [0, 1)
    /// 0 = no smoothing, every window stands alone
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            update_interval_ms: 16,
            min_decibels: -100.0,
            max_decibels: -30.0,
            smoothing_time_constant: 0.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins in every spectrum sample
    pub fn sample_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert frequency (Hz) to bin index at the given sample rate
    pub fn hz_to_bin(&self, hz: f32, sample_rate_hz: u32) -> usize {
        ((hz * self.fft_size as f32) / sample_rate_hz as f32) as usize
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(format!(
                "FFT size must be a power of 2 and at least 32, got {}",
                self.fft_size
            ));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(format!(
                "Smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            ));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_count(), 1024);
    }

    #[test]
    fn test_hz_to_bin() {
        let config = AnalyserConfig::default();

        // At 44100 Hz and 2048-point FFT: ≈ 21.53 Hz per bin
        assert_eq!(config.hz_to_bin(0.0, 44100), 0);
        assert_eq!(config.hz_to_bin(21.6, 44100), 1);
        assert_eq!(config.hz_to_bin(440.0, 44100), 20);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyserConfig::default();
        config.fft_size = 1000;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.min_decibels = -20.0;
        assert!(config.validate().is_err());

        let mut config = AnalyserConfig::default();
        config.smoothing_time_constant = 1.0;
        assert!(config.validate().is_err());
    }
}
