//! Reader-to-writer copy helpers.

use crate::sample::V;
use crate::stream::{Reader, Writer};
use crate::{Error, Result};

/// Buffer size used when neither side advertises a preference.
pub const DEFAULT_COPY_SIZE: usize = 32 * 1024;

/// Pick a copy block size from two advertised preferences.
///
/// The source's preference wins; zero means "no preference".
pub fn preferred_block_size(src_hint: usize, dst_hint: usize) -> usize {
    match (src_hint, dst_hint) {
        (0, 0) => DEFAULT_COPY_SIZE,
        (0, d) => d,
        (s, _) => s,
    }
}

/// Copy from `src` to `dst` through `buf` until `src` signals end-of-stream.
///
/// Returns the number of samples written. A writer that accepts fewer
/// samples than offered fails with [`Error::ShortWrite`].
///
/// # Panics
/// Panics if `buf` is empty.
pub fn copy_buffer<W, R>(dst: &mut W, src: &mut R, buf: &mut [V]) -> Result<u64>
where
    W: Writer + ?Sized,
    R: Reader + ?Sized,
{
    assert!(!buf.is_empty(), "copy_buffer: empty buffer");
    let mut written = 0u64;
    loop {
        let nr = src.read(buf)?;
        if nr == 0 {
            return Ok(written);
        }
        if nr > buf.len() {
            return Err(Error::InvalidRead {
                read: nr,
                capacity: buf.len(),
            });
        }
        let nw = dst.write(&buf[..nr])?;
        if nw > nr {
            return Err(Error::InvalidWrite {
                written: nw,
                offered: nr,
            });
        }
        written += nw as u64;
        if nw != nr {
            return Err(Error::ShortWrite {
                written: nw,
                offered: nr,
            });
        }
    }
}

/// Copy with a freshly allocated buffer of `block_size` samples
/// ([`DEFAULT_COPY_SIZE`] when zero).
pub fn copy<W, R>(dst: &mut W, src: &mut R, block_size: usize) -> Result<u64>
where
    W: Writer + ?Sized,
    R: Reader + ?Sized,
{
    let size = if block_size == 0 {
        DEFAULT_COPY_SIZE
    } else {
        block_size
    };
    let mut buf = vec![0.0; size];
    copy_buffer(dst, src, &mut buf)
}

/// Reads at most `limit` samples from the inner reader, then signals
/// end-of-stream.
pub struct LimitReader<R> {
    inner: R,
    remaining: usize,
}

impl<R: Reader> LimitReader<R> {
    pub fn new(inner: R, limit: usize) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reader> Reader for LimitReader<R> {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let max = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n.min(self.remaining);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_buffer::RingBuffer;

    struct Counter {
        next: V,
    }

    impl Reader for Counter {
        fn read(&mut self, buf: &mut [V]) -> Result<usize> {
            for v in buf.iter_mut() {
                *v = self.next;
                self.next += 1.0;
            }
            Ok(buf.len())
        }
    }

    struct Refuse;

    impl Writer for Refuse {
        fn write(&mut self, _buf: &[V]) -> Result<usize> {
            Ok(0)
        }
    }

    struct Liar;

    impl Writer for Liar {
        fn write(&mut self, buf: &[V]) -> Result<usize> {
            Ok(buf.len() + 1)
        }
    }

    #[test]
    fn test_preferred_block_size() {
        assert_eq!(preferred_block_size(0, 0), DEFAULT_COPY_SIZE);
        assert_eq!(preferred_block_size(0, 64), 64);
        assert_eq!(preferred_block_size(128, 64), 128);
    }

    #[test]
    fn test_copy_until_end_of_stream() {
        let mut src = RingBuffer::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut dst = RingBuffer::new();
        let mut buf = [0.0; 2];
        assert_eq!(copy_buffer(&mut dst, &mut src, &mut buf).unwrap(), 5);
        assert_eq!(dst.samples(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_limit_reader_caps_infinite_source() {
        let mut src = LimitReader::new(Counter { next: 0.0 }, 10);
        let mut dst = RingBuffer::new();
        assert_eq!(copy(&mut dst, &mut src, 3).unwrap(), 10);
        assert_eq!(src.remaining(), 0);
        assert_eq!(dst.len(), 10);
        assert_eq!(dst.samples()[9], 9.0);
    }

    #[test]
    fn test_short_write_is_fatal() {
        let mut src = RingBuffer::from_vec(vec![1.0; 4]);
        let err = copy(&mut Refuse, &mut src, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortWrite {
                written: 0,
                offered: 4
            }
        ));
    }

    #[test]
    fn test_overlong_write_is_invalid() {
        let mut src = RingBuffer::from_vec(vec![1.0; 4]);
        let err = copy(&mut Liar, &mut src, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidWrite { .. }));
    }

    #[test]
    #[should_panic(expected = "empty buffer")]
    fn test_empty_buffer_panics() {
        let mut src = RingBuffer::new();
        let mut dst = RingBuffer::new();
        let _ = copy_buffer(&mut dst, &mut src, &mut []);
    }
}
