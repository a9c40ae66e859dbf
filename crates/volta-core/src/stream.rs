//! Stream contract implemented by every module.
//!
//! A module produces samples through [`Reader`], consumes them through
//! [`Writer`], and does both as a [`Processor`]. Optional capabilities
//! ([`Configurable`], [`Close`]) are discovered at wiring time through
//! [`Writer::configurable`] and [`Writer::closer`], never through concrete
//! type knowledge.

use crate::config::Config;
use crate::sample::V;
use crate::{Error, Result};

/// Produces samples.
pub trait Reader: Send {
    /// Fill `buf` with up to `buf.len()` samples and return how many were
    /// produced.
    ///
    /// `Ok(0)` for a non-empty `buf` signals end-of-stream. Depending on the
    /// module this may be permanent (a closed channel) or only mean "nothing
    /// buffered right now" (an empty ring buffer).
    fn read(&mut self, buf: &mut [V]) -> Result<usize>;
}

/// Consumes samples.
pub trait Writer: Send {
    /// Consume `buf` and return how many samples were accepted.
    ///
    /// Accepting fewer than `buf.len()` samples without an error is a short
    /// write and is fatal to the owning pipeline.
    fn write(&mut self, buf: &[V]) -> Result<usize>;

    /// Configuration capability, if the module has one.
    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }

    /// Close capability, if the module has one.
    fn closer(&mut self) -> Option<&mut dyn Close> {
        None
    }
}

/// A block processor: writes go in, reads come out.
pub trait Processor: Reader + Writer {
    /// Preferred block size. Zero means no preference.
    ///
    /// Reads and writes may use any size; this is only a hint.
    fn block_size(&self) -> usize {
        0
    }
}

/// Modules that derive state from the global [`Config`].
pub trait Configurable {
    /// Apply `config`. Called once at wiring time and possibly again later.
    fn set_config(&mut self, config: &Config) -> Result<()>;
}

/// Modules holding resources that must be released at teardown.
pub trait Close {
    fn close(&mut self) -> Result<()>;
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    #[inline]
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        (**self).read(buf)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    #[inline]
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        (**self).write(buf)
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        (**self).configurable()
    }

    fn closer(&mut self) -> Option<&mut dyn Close> {
        (**self).closer()
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    #[inline]
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        (**self).read(buf)
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    #[inline]
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        (**self).write(buf)
    }
}

/// Adapts a plain [`Reader`] into a [`Processor`] so it can sit at the
/// producer end of a chain.
///
/// The producer end is never written to; a write is rejected.
pub struct Source<R> {
    inner: R,
}

impl<R: Reader> Source<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reader> Reader for Source<R> {
    #[inline]
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Reader> Writer for Source<R> {
    fn write(&mut self, _buf: &[V]) -> Result<usize> {
        Err(Error::Unsupported("write to a source-only stream"))
    }
}

impl<R: Reader> Processor for Source<R> {}
