//! Shared, read-only engine configuration.
//!
//! One `SynthConfig` is built at startup and copied into every component that
//! needs the sample rate. Nothing mutates it afterwards.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Samples per second delivered to the sink.
    pub sample_rate: f64,
    /// Samples accumulated before each sink write.
    pub batch_samples: usize,
    /// Length of the fade-in applied to the first samples, in seconds.
    pub soft_start_secs: f64,
    /// Capacity (in samples) of the queue between the render loop and the device.
    pub ring_capacity: usize,
    /// Flip the high bit of the pitch-bend MSB before decoding. Some MIDI
    /// stacks hand over the bend as signed two's complement instead of the
    /// 0..16383 wire value.
    pub invert_bend_msb: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            batch_samples: 16,
            soft_start_secs: 3.0,
            ring_capacity: 4096,
            invert_bend_msb: false,
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate * 0.5
    }

    #[inline]
    pub fn inv_sample_rate(&self) -> f64 {
        1.0 / self.sample_rate
    }

    #[inline]
    pub fn inv_nyquist(&self) -> f64 {
        2.0 / self.sample_rate
    }

    /// Map a frequency in Hz onto the normalized `[0, 1]` control range.
    #[inline]
    pub fn hz_to_value(&self, hz: f64) -> f64 {
        if hz <= 0.0 {
            0.0
        } else if hz >= self.nyquist() {
            1.0
        } else {
            hz * self.inv_nyquist()
        }
    }

    /// Inverse of [`hz_to_value`](Self::hz_to_value).
    #[inline]
    pub fn value_to_hz(&self, value: f64) -> f64 {
        if value <= 0.0 {
            0.0
        } else if value >= 1.0 {
            self.nyquist()
        } else {
            value * self.nyquist()
        }
    }

    /// Whole ticks covered by `seconds`, negative durations collapse to zero.
    #[inline]
    pub fn seconds_to_ticks(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 || !seconds.is_finite() {
            0
        } else {
            (seconds * self.sample_rate) as u64
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.batch_samples == 0 {
            return Err(ConfigError::Invalid("batch_samples must be at least 1".into()));
        }
        if !(self.soft_start_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "soft_start_secs must not be negative, got {}",
                self.soft_start_secs
            )));
        }
        if self.ring_capacity == 0 {
            return Err(ConfigError::Invalid("ring_capacity must be at least 1".into()));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded synth config");
        Ok(config)
    }
}
