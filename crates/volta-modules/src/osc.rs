//! Voltage controlled oscillators.
//!
//! An [`Osc`] reads a pitch CV and writes one audio sample per CV sample.
//! The CV is in semitones on top of the range and fine tuning: with
//! [`Range::R8`] and [`fine`]`(&StdTuning)` a CV of `69.0` plays A440, so a
//! MIDI key stream can drive it directly.

use crate::shaper;
use crate::tuning::Tuning;
use volta_core::{
    Config, Configurable, Processor, Reader, Result, RingBuffer, Writer, V,
};

/// Amplitude and direction of a waveform.
///
/// [`Polarity::NEGATIVE`] inverts the wave; magnitudes other than one scale it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity(pub V);

impl Polarity {
    pub const POSITIVE: Polarity = Polarity(1.0);
    pub const NEGATIVE: Polarity = Polarity(-1.0);
}

impl Default for Polarity {
    fn default() -> Self {
        Self::POSITIVE
    }
}

/// Pipe-organ footage. `Lo` is the LFO range; each step up is one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Range {
    #[default]
    Lo,
    R32,
    R16,
    R8,
    R4,
    R2,
}

impl Range {
    fn octave(self) -> i32 {
        self as i32
    }
}

/// Frequency in Hz for a range and fine tuning in semitones.
pub fn tone(range: Range, fine: f64) -> f64 {
    (range.octave() as f64 + fine / 12.0).exp2()
}

/// Fine tuning that makes [`Range::R8`] track MIDI keys in `tuning`.
pub fn fine<T: Tuning + ?Sized>(tuning: &T) -> f64 {
    12.0 * tuning.a4_hz().log2() - 105.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    /// High for `width` of each cycle, `0..=1`.
    Pulse { width: V },
}

impl Waveform {
    pub const SQUARE: Waveform = Waveform::Pulse { width: 0.5 };

    /// Value at `phase` (cycles, any real).
    #[inline]
    pub fn evaluate(&self, phase: f64) -> V {
        match *self {
            Waveform::Sine => shaper::sine(phase),
            Waveform::Triangle => shaper::triangle(phase),
            Waveform::Saw => shaper::sawtooth(phase),
            Waveform::Pulse { width } => {
                if phase.rem_euclid(1.0) < width {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Pitch CV in, audio out.
pub struct Osc {
    waveform: Waveform,
    polarity: Polarity,
    offset: V,
    range: Range,
    fine: f64,
    phase: f64,
    sample_rate: f64,
    pitch: RingBuffer,
}

impl Osc {
    pub fn new(waveform: Waveform, polarity: Polarity, range: Range, fine: f64) -> Self {
        Self {
            waveform,
            polarity,
            offset: 0.0,
            range,
            fine,
            phase: 0.0,
            sample_rate: Config::default().sample_rate_f64(),
            pitch: RingBuffer::new(),
        }
    }

    pub fn sine(polarity: Polarity, range: Range, fine: f64) -> Self {
        Self::new(Waveform::Sine, polarity, range, fine)
    }

    pub fn triangle(polarity: Polarity, range: Range, fine: f64) -> Self {
        Self::new(Waveform::Triangle, polarity, range, fine)
    }

    pub fn saw(polarity: Polarity, range: Range, fine: f64) -> Self {
        Self::new(Waveform::Saw, polarity, range, fine)
    }

    pub fn square(polarity: Polarity, range: Range, fine: f64) -> Self {
        Self::new(Waveform::SQUARE, polarity, range, fine)
    }

    /// Pulse wave with duty cycle `width` (clamped to `0..=1`) around `offset`.
    pub fn pulse(polarity: Polarity, offset: V, range: Range, fine: f64, width: V) -> Self {
        let mut osc = Self::new(
            Waveform::Pulse {
                width: width.clamp(0.0, 1.0),
            },
            polarity,
            range,
            fine,
        );
        osc.offset = offset;
        osc
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Phase in cycles, `0..1`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn tick(&mut self, cv: V) -> V {
        let v = self.polarity.0 * self.waveform.evaluate(self.phase) + self.offset;
        let hz = tone(self.range, self.fine + cv);
        self.phase = (self.phase + hz / self.sample_rate).fract();
        v
    }
}

impl Reader for Osc {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        let n = self.pitch.read_block(buf);
        for v in &mut buf[..n] {
            *v = self.tick(*v);
        }
        Ok(n)
    }
}

impl Writer for Osc {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        Ok(self.pitch.write_block(buf))
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Processor for Osc {}

impl Configurable for Osc {
    fn set_config(&mut self, config: &Config) -> Result<()> {
        self.sample_rate = config.sample_rate_f64();
        Ok(())
    }
}
