//! Test helpers and fixtures for volta integration tests.
//!
//! Patches run on their own worker thread, so tests poll shared sinks with
//! [`wait_for`] instead of sleeping for a fixed time.

#![allow(dead_code)]

pub mod tolerances;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use volta::prelude::*;

/// Sample rate that makes millisecond envelope times one sample each.
pub const TEST_SAMPLE_RATE: u32 = 1000;

/// Upper bound on any poll in the suite.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Engine at [`TEST_SAMPLE_RATE`] with small chunks. No audio device.
pub fn test_engine() -> VoltaEngine {
    init_tracing();
    VoltaEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .chunk_size(16)
        .build()
        .expect("Failed to create test engine")
}

/// Poll `cond` until it holds; panics after [`TEST_TIMEOUT`].
pub fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(start.elapsed() < TEST_TIMEOUT, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Poll until `sink` holds at least `n` samples, then take the first `n`.
pub fn collect(sink: &SharedBuffer, n: usize) -> Vec<V> {
    wait_for("sink to fill", || sink.len() >= n);
    sink.snapshot()[..n].to_vec()
}

/// Producer-end stage emitting exactly `n` copies of `v`, then ending.
pub fn constant(v: V, n: usize) -> Box<dyn Processor> {
    Box::new(Source::new(volta::LimitReader::new(Voltage::new(v), n)))
}

/// Producer-end stage emitting `n` gate-high samples.
pub fn gate_high(n: usize) -> Box<dyn Processor> {
    Box::new(Source::new(volta::LimitReader::new(Gate::new(true), n)))
}

/// Root mean square of a signal.
pub fn rms(samples: &[V]) -> V {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|v| v * v).sum::<V>() / samples.len() as V).sqrt()
}

pub fn peak(samples: &[V]) -> V {
    samples.iter().fold(0.0, |m: V, v| m.max(v.abs()))
}

pub fn is_silent(samples: &[V]) -> bool {
    peak(samples) < tolerances::SILENCE_THRESHOLD
}

/// Passthrough stage that records every sample rate it is configured with
/// and whether it was closed.
pub struct Probe {
    buffer: RingBuffer,
    pub rate: Arc<AtomicU32>,
    pub closed: Arc<AtomicBool>,
}

impl Probe {
    pub fn new() -> Self {
        Self {
            buffer: RingBuffer::new(),
            rate: Arc::new(AtomicU32::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn rate(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.rate)
    }

    pub fn closed(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl Reader for Probe {
    fn read(&mut self, buf: &mut [V]) -> volta::core::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Writer for Probe {
    fn write(&mut self, buf: &[V]) -> volta::core::Result<usize> {
        self.buffer.write(buf)
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }

    fn closer(&mut self) -> Option<&mut dyn Close> {
        Some(self)
    }
}

impl Processor for Probe {}

impl Configurable for Probe {
    fn set_config(&mut self, config: &Config) -> volta::core::Result<()> {
        self.rate.store(config.sample_rate, Ordering::SeqCst);
        Ok(())
    }
}

impl Close for Probe {
    fn close(&mut self) -> volta::core::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Destination that accepts only half of every write.
pub struct HalfSink;

impl Writer for HalfSink {
    fn write(&mut self, buf: &[V]) -> volta::core::Result<usize> {
        Ok(buf.len() / 2)
    }
}
