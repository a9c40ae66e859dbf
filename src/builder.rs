//! Builder for configuring and constructing a `VoltaEngine`.

use crate::core::Config;
use crate::{Result, VoltaEngine};

/// Every setting starts from [`Config::default`].
///
/// # Example
///
/// ```ignore
/// use volta::prelude::*;
///
/// let engine = VoltaEngine::builder()
///     .sample_rate(48_000)
///     .chunk_size(256)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoltaEngineBuilder {
    config: Config,
}

impl VoltaEngineBuilder {
    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    pub fn device_buffer_size(mut self, device_buffer_size: usize) -> Self {
        self.config.device_buffer_size = device_buffer_size;
        self
    }

    /// Default: 512
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<VoltaEngine> {
        VoltaEngine::new(self.config)
    }
}
