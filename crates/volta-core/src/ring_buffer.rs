//! Growable sample FIFO bridging mismatched block sizes.
//!
//! Growth follows an append-only buffer policy: use spare capacity when there
//! is some, slide unread samples to the front when that frees enough room,
//! otherwise reallocate at `2 * capacity + n`. Total copying stays
//! proportional to the number of samples written.

use crate::compat::{Arc, Mutex, MutexGuard};
use crate::sample::V;
use crate::stream::{Processor, Reader, Writer};
use crate::{Error, Result};

/// Capacity reserved for the first small write.
const SMALL_BUFFER_SIZE: usize = 64;

/// Minimum free space requested per `read_from` iteration.
pub const MIN_READ: usize = 512;

const MAX_CAPACITY: usize = isize::MAX as usize / core::mem::size_of::<V>();

/// FIFO of samples with a read offset and an append boundary.
///
/// Invariant: `off <= buf.len() <= buf.capacity()`.
#[derive(Debug, Clone, Default)]
pub struct RingBuffer {
    buf: Vec<V>,
    off: usize,
}

impl RingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            off: 0,
        }
    }

    /// Buffer whose initial contents are `buf`, ready to be read.
    pub fn from_vec(buf: Vec<V>) -> Self {
        Self { buf, off: 0 }
    }

    /// Unread samples.
    #[inline]
    pub fn samples(&self) -> &[V] {
        &self.buf[self.off..]
    }

    /// Number of unread samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len() - self.off
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.len() <= self.off
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Drop all content and rewind so the whole capacity is reusable.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.off = 0;
    }

    /// Keep only the first `n` unread samples.
    ///
    /// # Panics
    /// Panics if `n` exceeds [`len`](Self::len).
    pub fn truncate(&mut self, n: usize) {
        if n == 0 {
            self.reset();
            return;
        }
        assert!(n <= self.len(), "RingBuffer::truncate: out of range");
        self.buf.truncate(self.off + n);
    }

    /// Make room for at least `n` more samples without a later reallocation.
    ///
    /// # Panics
    /// Panics if the required capacity cannot be represented.
    pub fn grow(&mut self, n: usize) {
        let m = self.len();
        if m == 0 && self.off != 0 {
            self.reset();
        }
        if self.has_spare(n) {
            return;
        }
        let need = m
            .checked_add(n)
            .unwrap_or_else(|| panic!("RingBuffer: capacity overflow growing by {n}"));
        let c = self.buf.capacity();
        if c == 0 && n <= SMALL_BUFFER_SIZE {
            self.buf.reserve_exact(SMALL_BUFFER_SIZE);
            return;
        }
        if need <= c / 2 {
            // Only m + n <= c is needed to slide, but waiting for twice the
            // room keeps us from copying on every write.
            self.buf.copy_within(self.off.., 0);
            self.buf.truncate(m);
        } else {
            let new_capacity = c
                .checked_mul(2)
                .and_then(|c2| c2.checked_add(n))
                .filter(|&cap| cap <= MAX_CAPACITY)
                .unwrap_or_else(|| panic!("RingBuffer: capacity overflow growing by {n}"));
            let mut buf = Vec::with_capacity(new_capacity);
            buf.extend_from_slice(&self.buf[self.off..]);
            self.buf = buf;
        }
        self.off = 0;
    }

    #[inline]
    fn has_spare(&self, n: usize) -> bool {
        self.buf.capacity() - self.buf.len() >= n
    }

    /// Append `block`. Always accepts every sample.
    pub fn write_block(&mut self, block: &[V]) -> usize {
        if !self.has_spare(block.len()) {
            self.grow(block.len());
        }
        self.buf.extend_from_slice(block);
        block.len()
    }

    pub fn write_sample(&mut self, v: V) {
        if !self.has_spare(1) {
            self.grow(1);
        }
        self.buf.push(v);
    }

    /// Copy up to `block.len()` samples from the front into `block`.
    ///
    /// Returns 0 once the buffer is empty, rewinding it to reclaim space.
    pub fn read_block(&mut self, block: &mut [V]) -> usize {
        if self.is_empty() {
            self.reset();
            return 0;
        }
        let n = self.len().min(block.len());
        block[..n].copy_from_slice(&self.buf[self.off..self.off + n]);
        self.off += n;
        n
    }

    pub fn read_sample(&mut self) -> Option<V> {
        if self.is_empty() {
            self.reset();
            return None;
        }
        let v = self.buf[self.off];
        self.off += 1;
        Some(v)
    }

    /// Borrow the next `n` unread samples (fewer if not available) and
    /// advance past them.
    ///
    /// The slice is only valid until the next mutating call.
    pub fn next(&mut self, n: usize) -> &[V] {
        let n = n.min(self.len());
        let start = self.off;
        self.off += n;
        &self.buf[start..start + n]
    }

    /// Drop the next `n` unread samples (fewer if not available).
    pub fn discard(&mut self, n: usize) -> usize {
        let n = n.min(self.len());
        self.off += n;
        n
    }

    /// Append everything `reader` produces until it signals end-of-stream.
    pub fn read_from<R: Reader + ?Sized>(&mut self, reader: &mut R) -> Result<u64> {
        let mut total = 0u64;
        loop {
            self.grow(MIN_READ);
            let start = self.buf.len();
            let spare = self.buf.capacity() - start;
            self.buf.resize(start + spare, 0.0);
            match reader.read(&mut self.buf[start..]) {
                Ok(m) if m > spare => {
                    self.buf.truncate(start);
                    return Err(Error::InvalidRead {
                        read: m,
                        capacity: spare,
                    });
                }
                Ok(0) => {
                    self.buf.truncate(start);
                    return Ok(total);
                }
                Ok(m) => {
                    self.buf.truncate(start + m);
                    total += m as u64;
                }
                Err(e) => {
                    self.buf.truncate(start);
                    return Err(e);
                }
            }
        }
    }

    /// Flush every unread sample into `writer`.
    pub fn write_to<W: Writer + ?Sized>(&mut self, writer: &mut W) -> Result<u64> {
        let offered = self.len();
        if offered > 0 {
            let written = writer.write(&self.buf[self.off..])?;
            if written > offered {
                return Err(Error::InvalidWrite { written, offered });
            }
            self.off += written;
            if written != offered {
                return Err(Error::ShortWrite { written, offered });
            }
        }
        self.reset();
        Ok(offered as u64)
    }
}

impl Reader for RingBuffer {
    #[inline]
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        Ok(self.read_block(buf))
    }
}

impl Writer for RingBuffer {
    #[inline]
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.write_block(buf))
    }
}

impl Processor for RingBuffer {}

/// Cloneable handle to a [`RingBuffer`] shared between threads.
///
/// Useful as a patch destination that another thread inspects.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<RingBuffer>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the unread samples, leaving them in place.
    pub fn snapshot(&self) -> Vec<V> {
        self.inner.lock().samples().to_vec()
    }

    /// Take every unread sample.
    pub fn drain(&self) -> Vec<V> {
        let mut rb = self.inner.lock();
        let out = rb.samples().to_vec();
        rb.reset();
        out
    }

    pub fn lock(&self) -> MutexGuard<'_, RingBuffer> {
        self.inner.lock()
    }
}

impl Reader for SharedBuffer {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        Ok(self.inner.lock().read_block(buf))
    }
}

impl Writer for SharedBuffer {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.inner.lock().write_block(buf))
    }
}

impl Processor for SharedBuffer {}
