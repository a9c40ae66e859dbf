//! Sparse encoding for infrequently changing CVs.
//!
//! A gate that flips twice a second does not need 44100 samples per second
//! on the wire: a batch of `(index, value)` change points describes it, each
//! value holding until the next index.

use crate::ring_buffer::RingBuffer;
use crate::sample::V;
use crate::stream::{Processor, Reader, Writer};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A value that takes effect at `index` (relative to the start of its batch)
/// and holds until the next sample in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparseSample {
    pub index: usize,
    pub value: V,
}

impl SparseSample {
    pub fn new(index: usize, value: V) -> Self {
        Self { index, value }
    }
}

/// Check that indices never decrease.
pub fn validate_batch(batch: &[SparseSample]) -> Result<()> {
    for pair in batch.windows(2) {
        if pair[1].index < pair[0].index {
            return Err(Error::InvalidSparseBatch {
                index: pair[1].index,
                previous: pair[0].index,
            });
        }
    }
    Ok(())
}

/// Expand `batch` into `out`, starting from the held value `hold`.
///
/// Change points at or beyond `out.len()` are ignored. Returns the value
/// held at the end of the block.
pub fn densify(batch: &[SparseSample], out: &mut [V], hold: V) -> Result<V> {
    validate_batch(batch)?;
    let mut value = hold;
    let mut pos = 0;
    for s in batch {
        if s.index >= out.len() {
            break;
        }
        out[pos..s.index].fill(value);
        value = s.value;
        pos = s.index;
    }
    out[pos..].fill(value);
    Ok(value)
}

/// Emit the change points of `block`.
///
/// `prev` is the value held before the block; `None` forces a change point
/// at index 0.
pub fn sparsify(block: &[V], prev: Option<V>) -> Vec<SparseSample> {
    let mut out = Vec::new();
    let mut last = prev;
    for (i, &v) in block.iter().enumerate() {
        if last != Some(v) {
            out.push(SparseSample::new(i, v));
            last = Some(v);
        }
    }
    out
}

/// Replays queued sparse batches as a dense stream.
#[derive(Debug, Default)]
pub struct SparseReader {
    dense: RingBuffer,
    hold: V,
}

impl SparseReader {
    pub fn new(initial: V) -> Self {
        Self {
            dense: RingBuffer::new(),
            hold: initial,
        }
    }

    /// Queue a batch spanning `len` samples.
    pub fn push(&mut self, batch: &[SparseSample], len: usize) -> Result<()> {
        let mut block = vec![0.0; len];
        self.hold = densify(batch, &mut block, self.hold)?;
        self.dense.write_block(&block);
        Ok(())
    }

    /// Value held after the last queued batch.
    pub fn hold(&self) -> V {
        self.hold
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}

impl Reader for SparseReader {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        Ok(self.dense.read_block(buf))
    }
}

impl Writer for SparseReader {
    /// Dense input is re-encoded as held values.
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        if let Some(&last) = buf.last() {
            self.hold = last;
        }
        Ok(self.dense.write_block(buf))
    }
}

impl Processor for SparseReader {}
