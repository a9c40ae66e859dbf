//! Error types for volta-core.

use thiserror::Error;

/// Error type for volta-core operations.
///
/// End-of-stream is not represented here: a `read` returning `Ok(0)` for a
/// non-empty block is the end-of-stream signal, as with `std::io::Read`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Short write: {written} of {offered} samples accepted")]
    ShortWrite { written: usize, offered: usize },

    #[error("Invalid write: writer reported {written} samples for a block of {offered}")]
    InvalidWrite { written: usize, offered: usize },

    #[error("Invalid read: reader reported {read} samples for a block of {capacity}")]
    InvalidRead { read: usize, capacity: usize },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Stream closed")]
    Closed,

    #[error("Sparse batch out of order: index {index} after {previous}")]
    InvalidSparseBatch { index: usize, previous: usize },

    #[error("Module fault: {0}")]
    Module(String),

    #[error("Patch worker panicked")]
    WorkerPanicked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "device")]
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "device")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "device")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "device")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[cfg(feature = "device")]
    #[error("Failed to pause audio stream")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[cfg(feature = "device")]
    #[error("Failed to enumerate devices")]
    DevicesError(#[from] cpal::DevicesError),

    #[cfg(feature = "device")]
    #[error("Failed to get device name")]
    DeviceNameError(#[from] cpal::DeviceNameError),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
