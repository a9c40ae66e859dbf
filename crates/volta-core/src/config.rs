//! Rack configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default orchestrator block cap (about 12ms at 44.1kHz).
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Global parameters pushed into every configurable module at patch time.
///
/// Modules keep their own derived state (phase counters, envelope timers)
/// and recompute it whenever a new `Config` arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples played per second.
    pub sample_rate: u32,

    /// Preferred size of module-internal buffers. Zero means no preference.
    pub buffer_size: usize,

    /// Size of the queue in front of the audio device.
    ///
    /// Devices need a large queue to avoid underruns, but playback will not
    /// start until the first callback drains it.
    pub device_buffer_size: usize,

    /// Maximum number of samples moved per chain stage per pass.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_size: 44_100,
            device_buffer_size: 44_100,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_device_buffer_size(mut self, device_buffer_size: usize) -> Self {
        self.device_buffer_size = device_buffer_size;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sample rate as a float, for per-sample math.
    #[inline]
    pub fn sample_rate_f64(&self) -> f64 {
        self.sample_rate as f64
    }

    /// Number of whole samples covering `seconds`, rounded to nearest.
    ///
    /// Zero or negative durations map to zero samples.
    pub fn samples_for(&self, seconds: f64) -> usize {
        if seconds <= 0.0 {
            return 0;
        }
        (self.sample_rate_f64() * seconds).round() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample_rate must be > 0".into()));
        }
        if self.device_buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "device_buffer_size must be > 0".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be > 0".into()));
        }
        Ok(())
    }
}
