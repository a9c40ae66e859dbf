//! Centralized error type for the volta umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] volta_core::Error),

    #[error("Module: {0}")]
    Modules(#[from] volta_modules::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] volta_midi::Error),

    #[error("Unknown patch: {0}")]
    UnknownPatch(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
