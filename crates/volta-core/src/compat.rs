//! Synchronization types used across the crate.

pub use parking_lot::{Mutex, MutexGuard, RwLock};

pub use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
