//! White noise source.

use crate::osc::Polarity;
use volta_core::{Reader, Result, V};

const NOISE_SEED: u32 = 1_260_667_865;

/// Xorshift32 white noise, scaled by polarity and shifted by an offset.
///
/// Output lies in `offset ± |polarity|`.
#[derive(Debug, Clone)]
pub struct Noise {
    state: u32,
    polarity: Polarity,
    offset: V,
}

impl Noise {
    pub fn new(polarity: Polarity) -> Self {
        Self::with_seed(polarity, NOISE_SEED)
    }

    /// A zero seed would lock xorshift at zero; it is replaced by the default.
    pub fn with_seed(polarity: Polarity, seed: u32) -> Self {
        Self {
            state: if seed == 0 { NOISE_SEED } else { seed },
            polarity,
            offset: 0.0,
        }
    }

    pub fn with_offset(mut self, offset: V) -> Self {
        self.offset = offset;
        self
    }

    #[inline]
    pub fn next_sample(&mut self) -> V {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        let unit = 2.0 * (x as V / u32::MAX as V) - 1.0;
        unit * self.polarity.0 + self.offset
    }
}

impl Reader for Noise {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        for v in buf.iter_mut() {
            *v = self.next_sample();
        }
        Ok(buf.len())
    }
}
