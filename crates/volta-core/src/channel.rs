//! Channel-backed sample streams.
//!
//! Unlike a [`RingBuffer`](crate::RingBuffer), a channel reader blocks until
//! a sample arrives and only reports end-of-stream once every writer is gone,
//! which makes it the natural upstream for trigger-rate sources (MIDI gates,
//! UI knobs) feeding a [`latch`](crate::latch()).

use crate::sample::V;
use crate::stream::{Processor, Reader, Writer};
use crate::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

/// Create a bounded sample channel.
///
/// A capacity of zero makes every write a rendezvous with a read.
pub fn channel(capacity: usize) -> (ChannelWriter, ChannelReader) {
    let (tx, rx) = bounded(capacity);
    (ChannelWriter { tx }, ChannelReader { rx })
}

/// Sending half. Cloneable; the stream ends when every clone is dropped.
#[derive(Debug, Clone)]
pub struct ChannelWriter {
    tx: Sender<V>,
}

impl ChannelWriter {
    /// Send one sample, blocking while the channel is full.
    pub fn send(&self, v: V) -> Result<()> {
        self.tx.send(v).map_err(|_| Error::Closed)
    }

    /// Send without blocking. Returns `Ok(false)` if the channel is full.
    pub fn try_send(&self, v: V) -> Result<bool> {
        match self.tx.try_send(v) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Disconnected(_)) => Err(Error::Closed),
        }
    }
}

impl Writer for ChannelWriter {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        for &v in buf {
            self.send(v)?;
        }
        Ok(buf.len())
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct ChannelReader {
    rx: Receiver<V>,
}

impl ChannelReader {
    /// Number of samples queued right now.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Reader for ChannelReader {
    /// Blocks for the first sample, then takes whatever else is queued.
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.rx.recv() {
            Ok(v) => buf[0] = v,
            Err(_) => return Ok(0),
        }
        let mut n = 1;
        while n < buf.len() {
            match self.rx.try_recv() {
                Ok(v) => {
                    buf[n] = v;
                    n += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(n)
    }
}

impl Writer for ChannelReader {
    fn write(&mut self, _buf: &[V]) -> Result<usize> {
        Err(Error::Unsupported("write to a channel reader"))
    }
}

impl Processor for ChannelReader {}
