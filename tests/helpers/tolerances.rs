//! Tolerance constants for signal tests.

/// Arithmetic that should be exact up to float rounding (gain, passthrough).
pub const FLOAT_EPSILON: f64 = 1e-9;

/// Oscillator and envelope math accumulated over many samples.
pub const DSP_EPSILON: f64 = 1e-6;

/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f64 = 1e-4;
