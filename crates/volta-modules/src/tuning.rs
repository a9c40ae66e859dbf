//! Chromatic tuning helpers.
//!
//! Keys follow MIDI numbering: A4 is key 69, C-1 is key 0.

/// Reference pitch for A4 in standard tuning.
pub const A4_FREQ: f64 = 440.0;

/// MIDI key of A4.
pub const A4_KEY: i32 = 69;

/// A chromatic scale anchored at A4.
pub trait Tuning {
    /// Frequency of A4 in Hz.
    fn a4_hz(&self) -> f64;
}

/// A440 tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StdTuning;

impl Tuning for StdTuning {
    fn a4_hz(&self) -> f64 {
        A4_FREQ
    }
}

/// Tuning with an arbitrary A4 reference (e.g. 432 Hz).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference(pub f64);

impl Tuning for Reference {
    fn a4_hz(&self) -> f64 {
        self.0
    }
}

/// Nearest key at or below frequency `hz`, clamped to `0..=127`.
pub fn key_for_hz<T: Tuning + ?Sized>(tuning: &T, hz: f64) -> u8 {
    let key = (A4_KEY as f64 + 12.0 * (hz / tuning.a4_hz()).log2()).floor();
    key.clamp(0.0, 127.0) as u8
}

/// Frequency of `key`.
pub fn pitch<T: Tuning + ?Sized>(tuning: &T, key: i32) -> f64 {
    tone(tuning, key as f64)
}

/// Frequency of a fractional key.
pub fn tone<T: Tuning + ?Sized>(tuning: &T, key: f64) -> f64 {
    tuning.a4_hz() * ((key - A4_KEY as f64) / 12.0).exp2()
}

// Note constants in octave 0.
pub const C: i32 = 12;
pub const DB: i32 = 13;
pub const D: i32 = 14;
pub const EB: i32 = 15;
pub const E: i32 = 16;
pub const F: i32 = 17;
pub const GB: i32 = 18;
pub const G: i32 = 19;
pub const AB: i32 = 20;
pub const A: i32 = 21;
pub const BB: i32 = 22;
pub const B: i32 = 23;

/// Key of `note` in `octave`, e.g. `note(A, 4) == 69`.
///
/// Piano keys range from A0 (21) to C8 (108).
pub fn note(note: i32, octave: i32) -> i32 {
    note + 12 * octave
}
