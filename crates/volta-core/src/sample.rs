//! Sample model shared by every stream.

/// A single CV or audio value.
///
/// Audio amplitudes live in `[-1, 1]` by convention. Control voltages use
/// whatever range the module documents, e.g. one volt per octave for pitch.
pub type V = f64;

/// A block of samples exchanged in one `read` or `write` call.
///
/// Callees must not retain the slice past the call.
pub type Block = [V];

/// Silence.
pub const ZERO: V = 0.0;
