//! MIDI note input for Volta.
//!
//! Raw MIDI bytes become [`MidiEvent`]s, and a [`NoteInterface`] turns those
//! into three independent sample streams (gate, key, velocity) that the rest
//! of a patch consumes without knowing anything about MIDI.
//!
//! # Feature-gated APIs
//!
//! - `"midi-io"`: [`MidiInputPort`] for hardware input via `midir`

pub mod error;
pub use error::{Error, Result};

pub mod event;
pub use event::MidiEvent;

mod interface;
pub use interface::{NoteInterface, NoteStreams};

#[cfg(feature = "midi-io")]
mod input;
#[cfg(feature = "midi-io")]
pub use input::{MidiInputDevice, MidiInputPort};
