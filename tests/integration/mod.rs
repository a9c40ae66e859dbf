//! Integration test modules for volta

pub mod chain;
pub mod engine;
pub mod envelope;
pub mod routing;
