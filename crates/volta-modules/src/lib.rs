//! Modules for Volta: envelopes, amplifiers, oscillators and control sources
//! built on the `volta-core` stream contract.
//!
//! - [`Adsr`]: gate in, envelope out
//! - [`Vca`]: audio times amplitude CV
//! - [`Osc`] / [`Noise`]: audio sources
//! - [`Voltage`], [`FuncSource`], [`Gate`]: control sources
//! - [`Shaper`]: per-sample functions
//! - [`tuning`]: key and frequency conversions

pub mod error;
pub use error::{Error, Result};

pub mod adsr;
pub use adsr::{Adsr, AdsrParams, Stage};

pub mod vca;
pub use vca::{Vca, VcaControl};

pub mod osc;
pub use osc::{Osc, Polarity, Range, Waveform};

mod noise;
pub use noise::Noise;

pub mod control;
pub use control::{FuncSource, Gate, Voltage};

pub mod shaper;
pub use shaper::Shaper;

pub mod tuning;
pub use tuning::{StdTuning, Tuning};
