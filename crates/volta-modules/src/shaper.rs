//! Per-sample wave shapers.
//!
//! The built-in shapers map a phase `v` (one cycle per unit) onto a
//! waveform in `[-1, 1]`.

use std::f64::consts::PI;
use volta_core::{Processor, Reader, Result, RingBuffer, Writer, V};

pub fn sine(v: V) -> V {
    (2.0 * PI * v).sin()
}

pub fn sawtooth(v: V) -> V {
    2.0 / PI * (PI * v).tan().atan()
}

pub fn triangle(v: V) -> V {
    2.0 / PI * (2.0 * PI * v).sin().asin()
}

/// Normalized sinc; `sinc(0) == 1`.
pub fn sinc(v: V) -> V {
    if v == 0.0 {
        return 1.0;
    }
    (PI * v).sin() / (PI * v)
}

/// Applies a function to every sample passing through.
pub struct Shaper {
    f: Box<dyn Fn(V) -> V + Send>,
    input: RingBuffer,
}

impl Shaper {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(V) -> V + Send + 'static,
    {
        Self {
            f: Box::new(f),
            input: RingBuffer::new(),
        }
    }

    pub fn sine() -> Self {
        Self::new(sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(sawtooth)
    }

    pub fn triangle() -> Self {
        Self::new(triangle)
    }

    pub fn sinc() -> Self {
        Self::new(sinc)
    }
}

impl Reader for Shaper {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        let n = self.input.read_block(buf);
        for v in &mut buf[..n] {
            *v = (self.f)(*v);
        }
        Ok(n)
    }
}

impl Writer for Shaper {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.input.write_block(buf))
    }
}

impl Processor for Shaper {}
