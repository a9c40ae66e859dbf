//! Signal-flow runtime for modular CV/audio synthesis.
//!
//! Modules exchange blocks of [`V`] samples through a byte-stream-like
//! contract and are wired into chains that run on their own worker thread.
//!
//! # Primary API
//!
//! - [`Reader`] / [`Writer`] / [`Processor`]: the stream contract
//! - [`RingBuffer`]: growable FIFO sample buffer
//! - [`Mult`]: one writer, many independent readers
//! - [`latch()`]: hold the latest value of a slow producer
//! - [`Rack`] / [`patch()`] / [`PatchHandle`]: chain orchestration
//!
//! # Feature-gated APIs
//!
//! - `"device"`: [`DeviceWriter`] for CPAL audio output
//!
//! # Example
//!
//! ```ignore
//! use volta_core::*;
//!
//! let rack = Rack::new(Config::default())?;
//! let sink = SharedBuffer::new();
//! let mut handle = rack.patch(Box::new(sink.clone()), vec![Box::new(vca), Box::new(osc)])?;
//! handle.cancel()?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod sample;
pub use sample::{Block, V, ZERO};

pub mod config;
pub use config::{Config, DEFAULT_CHUNK_SIZE};

pub mod compat;

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicLatch};

pub mod stream;
pub use stream::{Close, Configurable, Processor, Reader, Source, Writer};

pub mod ring_buffer;
pub use ring_buffer::{RingBuffer, SharedBuffer, MIN_READ};

mod copy;
pub use copy::{copy, copy_buffer, preferred_block_size, LimitReader, DEFAULT_COPY_SIZE};

mod channel;
pub use channel::{channel, ChannelReader, ChannelWriter};

pub mod sparse;
pub use sparse::{densify, sparsify, SparseReader, SparseSample};

mod mult;
pub use mult::{Mult, MultOutput};

mod latch;
pub use latch::{latch, LatchOutput};

mod patch;
pub use patch::{patch, PatchHandle, Rack};

#[cfg(feature = "device")]
mod device;
#[cfg(feature = "device")]
pub use device::DeviceWriter;
