//! Voltage controlled amplifier.
//!
//! Audio is written into the VCA itself; the amplitude CV arrives through a
//! separate [`VcaControl`] endpoint, usually fed by an envelope. Each input
//! has its own buffer, and a read multiplies them sample by sample.
//!
//! When one side has nothing buffered the other side is treated as playing
//! against silence: its samples are consumed and zeros are emitted. The VCA
//! never waits for a starved input.

use volta_core::compat::{Arc, Mutex};
use volta_core::{Processor, Reader, Result, RingBuffer, Writer, V};

type Shared = Arc<Mutex<RingBuffer>>;

/// Audio in via `write`, amplified audio out via `read`.
pub struct Vca {
    audio: RingBuffer,
    control: Shared,
    scratch: Vec<V>,
}

impl Vca {
    pub fn new() -> Self {
        Self {
            audio: RingBuffer::new(),
            control: Arc::new(Mutex::new(RingBuffer::new())),
            scratch: Vec::new(),
        }
    }

    /// Write endpoint for the amplitude CV.
    pub fn control(&self) -> VcaControl {
        VcaControl {
            buffer: Arc::clone(&self.control),
        }
    }

    /// Buffered (audio, control) sample counts.
    pub fn buffered(&self) -> (usize, usize) {
        (self.audio.len(), self.control.lock().len())
    }
}

impl Default for Vca {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for Vca {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        let mut control = self.control.lock();
        let audio_len = self.audio.len();
        let control_len = control.len();

        match (audio_len, control_len) {
            (0, 0) => Ok(0),
            (0, c) => {
                let n = c.min(buf.len());
                control.discard(n);
                buf[..n].fill(0.0);
                Ok(n)
            }
            (a, 0) => {
                let n = a.min(buf.len());
                self.audio.discard(n);
                buf[..n].fill(0.0);
                Ok(n)
            }
            (a, c) => {
                let n = a.min(c).min(buf.len());
                self.audio.read_block(&mut buf[..n]);
                if self.scratch.len() < n {
                    self.scratch.resize(n, 0.0);
                }
                control.read_block(&mut self.scratch[..n]);
                for (v, amp) in buf[..n].iter_mut().zip(&self.scratch[..n]) {
                    *v *= amp;
                }
                Ok(n)
            }
        }
    }
}

impl Writer for Vca {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.audio.write_block(buf))
    }
}

impl Processor for Vca {}

/// Amplitude input of a [`Vca`]. Cloneable; clones feed the same buffer.
#[derive(Clone)]
pub struct VcaControl {
    buffer: Shared,
}

impl VcaControl {
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Writer for VcaControl {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.buffer.lock().write_block(buf))
    }
}
