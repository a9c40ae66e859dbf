//! Control sources: constant voltages, closures, and gates.
//!
//! Each source is an endless [`Reader`]. Wrap one in
//! [`Source`](volta_core::Source) to put it at the producer end of a chain.

use volta_core::compat::Arc;
use volta_core::{AtomicFlag, AtomicLatch, Reader, Result, V};

/// Constant voltage. The level can be changed from another thread through
/// the shared handle.
#[derive(Debug, Clone)]
pub struct Voltage {
    level: Arc<AtomicLatch>,
}

impl Voltage {
    pub fn new(v: V) -> Self {
        Self {
            level: Arc::new(AtomicLatch::new(v)),
        }
    }

    pub fn level(&self) -> Arc<AtomicLatch> {
        Arc::clone(&self.level)
    }

    pub fn set(&self, v: V) {
        self.level.store(v);
    }

    pub fn get(&self) -> V {
        self.level.load()
    }
}

impl Reader for Voltage {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        buf.fill(self.level.load());
        Ok(buf.len())
    }
}

/// Variable voltage from evaluating a closure once per sample.
pub struct FuncSource<F> {
    f: F,
}

impl<F> FuncSource<F>
where
    F: FnMut() -> V + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Reader for FuncSource<F>
where
    F: FnMut() -> V + Send,
{
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        for v in buf.iter_mut() {
            *v = (self.f)();
        }
        Ok(buf.len())
    }
}

/// On/off switch read as `1.0` / `0.0`. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    on: Arc<AtomicFlag>,
}

impl Gate {
    pub fn new(on: bool) -> Self {
        Self {
            on: Arc::new(AtomicFlag::new(on)),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    pub fn set_on(&self, on: bool) {
        self.on.set(on);
    }
}

impl Reader for Gate {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        buf.fill(if self.on.get() { 1.0 } else { 0.0 });
        Ok(buf.len())
    }
}
