//! # Volta - Modular Synthesis Runtime
//!
//! Patch modules together like cables on a modular synth: every module
//! speaks one sample-stream contract, and chains of them run on their own
//! worker threads.
//!
//! ## Architecture
//!
//! Volta is an umbrella crate that coordinates:
//! - **volta-core** - Stream contract, ring buffer, mult, latch, patch orchestration
//! - **volta-modules** - ADSR, VCA, oscillators, noise, control sources, shapers
//! - **volta-midi** - MIDI note events split into gate / key / velocity streams
//!
//! ## Quick Start
//!
//! ```ignore
//! use volta::prelude::*;
//!
//! let engine = VoltaEngine::builder().sample_rate(48_000).build()?;
//!
//! let vca = Vca::new();
//! let amp = vca.control();
//! let osc = Osc::sine(Polarity::POSITIVE, Range::R8, fine(&StdTuning));
//!
//! // pitch -> osc -> vca -> sink
//! let sink = SharedBuffer::new();
//! engine.patch(
//!     Box::new(sink.clone()),
//!     vec![Box::new(vca), Box::new(osc), Box::new(Source::new(Voltage::new(69.0)))],
//! )?;
//! ```
//!
//! ## Feature Flags
//!
//! - `device` - Sound card output via CPAL
//! - `midi-io` - Hardware MIDI input via midir
//! - `full` - Everything enabled

/// Re-export of volta-core for direct access
pub use volta_core as core;

/// Re-export of volta-modules
pub use volta_modules as modules;

/// Re-export of volta-midi
pub use volta_midi as midi;

// Core types
pub use volta_core::{
    channel, copy, latch, patch, ChannelReader, ChannelWriter, Close, Config, Configurable,
    LatchOutput, LimitReader, Mult, MultOutput, PatchHandle, Processor, Rack, Reader, RingBuffer,
    SharedBuffer, Source, Writer, V,
};

#[cfg(feature = "device")]
pub use volta_core::DeviceWriter;

// Modules
pub use volta_modules::{
    Adsr, AdsrParams, FuncSource, Gate, Noise, Osc, Polarity, Range, Shaper, Vca, VcaControl,
    Voltage, Waveform,
};

// MIDI
pub use volta_midi::{MidiEvent, NoteInterface, NoteStreams};

#[cfg(feature = "midi-io")]
pub use volta_midi::MidiInputPort;

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::VoltaEngineBuilder;
pub use engine::{PatchId, VoltaEngine};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{PatchId, VoltaEngine, VoltaEngineBuilder};

    // Stream contract
    pub use crate::core::{
        Close, Config, Configurable, Processor, Reader, RingBuffer, SharedBuffer, Source, Writer,
        V,
    };

    // Routing
    pub use crate::core::{channel, latch, Mult, MultOutput};

    // Modules
    pub use crate::modules::osc::fine;
    pub use crate::modules::tuning::{note, pitch};
    pub use crate::modules::{
        Adsr, AdsrParams, FuncSource, Gate, Noise, Osc, Polarity, Range, Shaper, StdTuning,
        Tuning, Vca, VcaControl, Voltage, Waveform,
    };

    // MIDI
    pub use crate::midi::{MidiEvent, NoteInterface, NoteStreams};

    #[cfg(feature = "device")]
    pub use crate::core::DeviceWriter;
}
