//! Mult: one writer fanned out to any number of readers.
//!
//! Every registered output has its own buffer. A write appends the block to
//! all of them under the registry's write lock, so each output receives the
//! written sequence in order starting from the moment it was registered.
//! Reads take the registry's read lock, which means outputs never block each
//! other and only contend with a concurrent write or registration.
//!
//! Output buffers are unbounded: an output that is never read grows without
//! limit. Dropping an output unregisters it.

use crate::compat::{Arc, Mutex, RwLock};
use crate::ring_buffer::RingBuffer;
use crate::sample::V;
use crate::stream::{Processor, Reader, Writer};
use crate::{Error, Result};

type OutputBuffer = Arc<Mutex<RingBuffer>>;

#[derive(Default)]
struct Registry {
    outputs: Vec<(u64, OutputBuffer)>,
    next_id: u64,
}

/// Writer end of a fan-out. Clones share the same outputs.
#[derive(Clone, Default)]
pub struct Mult {
    registry: Arc<RwLock<Registry>>,
}

impl Mult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new output. It sees every sample written from now on.
    pub fn output(&self) -> MultOutput {
        let buffer: OutputBuffer = Arc::new(Mutex::new(RingBuffer::new()));
        let mut registry = self.registry.write();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.outputs.push((id, Arc::clone(&buffer)));
        tracing::debug!(id, outputs = registry.outputs.len(), "mult output registered");
        MultOutput {
            id,
            buffer,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Number of live outputs.
    pub fn outputs(&self) -> usize {
        self.registry.read().outputs.len()
    }

    /// Largest number of unread samples held for any output.
    pub fn max_backlog(&self) -> usize {
        self.registry
            .read()
            .outputs
            .iter()
            .map(|(_, b)| b.lock().len())
            .max()
            .unwrap_or(0)
    }
}

impl Writer for Mult {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        let registry = self.registry.write();
        for (_, buffer) in &registry.outputs {
            buffer.lock().write_block(buf);
        }
        Ok(buf.len())
    }
}

/// Reader end of a [`Mult`].
pub struct MultOutput {
    id: u64,
    buffer: OutputBuffer,
    registry: Arc<RwLock<Registry>>,
}

impl MultOutput {
    /// Unread samples buffered for this output.
    pub fn len(&self) -> usize {
        let _registry = self.registry.read();
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reader for MultOutput {
    /// Reads whatever is buffered; `Ok(0)` only means "nothing yet".
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        let _registry = self.registry.read();
        Ok(self.buffer.lock().read_block(buf))
    }
}

impl Writer for MultOutput {
    fn write(&mut self, _buf: &[V]) -> Result<usize> {
        Err(Error::Unsupported("write to a mult output"))
    }
}

impl Processor for MultOutput {}

impl Drop for MultOutput {
    fn drop(&mut self) {
        let mut registry = self.registry.write();
        registry.outputs.retain(|(id, _)| *id != self.id);
        tracing::debug!(id = self.id, outputs = registry.outputs.len(), "mult output dropped");
    }
}
