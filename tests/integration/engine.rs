//! Engine lifecycle integration tests
//!
//! Builder validation, patch bookkeeping, reconfiguration and shutdown.

use std::sync::atomic::Ordering;
use volta::prelude::*;
use volta::Error;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::*;

#[test]
fn test_builder_defaults() {
    let engine = VoltaEngine::builder().build().unwrap();
    assert_eq!(engine.sample_rate(), 44_100);
    assert_eq!(engine.config().chunk_size, volta::core::DEFAULT_CHUNK_SIZE);
    assert_eq!(engine.patch_count(), 0);
}

#[test]
fn test_builder_applies_settings() {
    let engine = VoltaEngine::builder()
        .sample_rate(48_000)
        .buffer_size(256)
        .device_buffer_size(2048)
        .chunk_size(64)
        .build()
        .unwrap();
    let config = engine.config();
    assert_eq!(config.sample_rate, 48_000);
    assert_eq!(config.buffer_size, 256);
    assert_eq!(config.device_buffer_size, 2048);
    assert_eq!(config.chunk_size, 64);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = VoltaEngine::builder().chunk_size(0).build();
    assert!(matches!(
        result,
        Err(Error::Core(volta::core::Error::InvalidConfig(_)))
    ));

    let result = VoltaEngine::builder()
        .config(Config::default().with_sample_rate(0))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_patch_and_cancel() {
    let engine = test_engine();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![Box::new(Source::new(Voltage::new(0.25)))],
        )
        .unwrap();
    assert_eq!(engine.patch_count(), 1);
    assert!(!engine.is_finished(id).unwrap());

    let out = collect(&sink, 64);
    assert!(out.iter().all(|&v| v == 0.25));

    engine.cancel(id).unwrap();
    assert_eq!(engine.patch_count(), 0);
    assert!(matches!(engine.cancel(id), Err(Error::UnknownPatch(_))));
    assert!(matches!(engine.is_finished(id), Err(Error::UnknownPatch(_))));
}

#[test]
fn test_patch_ids_are_unique() {
    let engine = test_engine();
    let a = engine
        .patch(Box::new(SharedBuffer::new()), vec![constant(1.0, 4)])
        .unwrap();
    let b = engine
        .patch(Box::new(SharedBuffer::new()), vec![constant(1.0, 4)])
        .unwrap();
    assert_ne!(a, b);
    assert!(b.get() > a.get());
    engine.cancel_all().unwrap();
    assert_eq!(engine.patch_count(), 0);
}

#[test]
fn test_failed_patch_is_reaped_with_error() {
    let engine = test_engine();
    let ok = engine
        .patch(Box::new(SharedBuffer::new()), vec![Box::new(Source::new(Voltage::new(0.0)))])
        .unwrap();
    let failing = engine
        .patch(Box::new(HalfSink), vec![constant(1.0, 8)])
        .unwrap();

    wait_for("failing patch to stop", || engine.is_finished(failing).unwrap());
    let reaped = engine.reap();
    assert_eq!(reaped.len(), 1);
    assert_eq!(reaped[0].0, failing);
    assert!(matches!(
        reaped[0].1,
        Err(Error::Core(volta::core::Error::ShortWrite { .. }))
    ));

    assert_eq!(engine.patch_count(), 1);
    engine.cancel(ok).unwrap();
}

#[test]
fn test_set_config_reaches_running_patches() {
    let mut engine = test_engine();
    let probe = Probe::new();
    let rate = probe.rate();
    engine
        .patch(
            Box::new(SharedBuffer::new()),
            vec![Box::new(probe), Box::new(Source::new(Voltage::new(0.0)))],
        )
        .unwrap();
    assert_eq!(rate.load(Ordering::SeqCst), TEST_SAMPLE_RATE);

    let config = engine.config().with_sample_rate(2000);
    engine.set_config(config).unwrap();
    assert_eq!(engine.sample_rate(), 2000);
    wait_for("probe to see the new rate", || rate.load(Ordering::SeqCst) == 2000);
}

#[test]
fn test_set_config_rejects_invalid() {
    let mut engine = test_engine();
    let bad = engine.config().with_chunk_size(0);
    assert!(engine.set_config(bad).is_err());
    assert_eq!(engine.config().chunk_size, 16);
}

#[test]
fn test_drop_closes_every_patch() {
    let probes: Vec<_> = (0..3).map(|_| Probe::new()).collect();
    let flags: Vec<_> = probes.iter().map(Probe::closed).collect();
    {
        let engine = test_engine();
        for probe in probes {
            engine
                .patch(
                    Box::new(SharedBuffer::new()),
                    vec![Box::new(probe), Box::new(Source::new(Voltage::new(0.0)))],
                )
                .unwrap();
        }
    }
    assert!(flags.iter().all(|f| f.load(Ordering::SeqCst)));
}
