//! Lock-free primitives shared between stream tasks.

use crate::sample::V;
use atomic_float::AtomicF64;
use crate::compat::{AtomicBool, Ordering};

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Single-sample mailbox with lock-free store/load.
///
/// The value is stored as one 64-bit word, so a reader sees either the
/// initial zero or a value that was actually stored, never a torn mix.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicLatch {
    value: AtomicF64,
}

impl AtomicLatch {
    pub fn new(value: V) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn load(&self) -> V {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn store(&self, value: V) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicLatch {
    fn default() -> Self {
        Self::new(0.0)
    }
}
