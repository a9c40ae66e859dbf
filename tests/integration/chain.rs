//! Signal flow through multi-stage chains.
//!
//! The last element of a chain is the producer; samples flow toward the
//! first element and then into the destination.

use approx::assert_abs_diff_eq;
use volta::prelude::*;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::tolerances::*;
use helpers::*;

#[test]
fn test_vca_scales_constant_voltage() {
    let engine = VoltaEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .chunk_size(4)
        .build()
        .unwrap();
    let vca = Vca::new();
    vca.control().write(&[0.5; 8]).unwrap();

    let sink = SharedBuffer::new();
    let id = engine
        .patch(Box::new(sink.clone()), vec![Box::new(vca), constant(1.0, 8)])
        .unwrap();

    let out = collect(&sink, 8);
    engine.cancel(id).unwrap();
    assert_eq!(out, vec![0.5; 8]);
    assert_eq!(sink.len(), 8);
}

#[test]
fn test_shaper_chain_preserves_sample_count() {
    let engine = test_engine();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![
                Box::new(Shaper::new(|v| v * 2.0)),
                Box::new(Shaper::sine()),
                constant(0.25, 100),
            ],
        )
        .unwrap();

    let out = collect(&sink, 100);
    engine.cancel(id).unwrap();
    assert_eq!(sink.len(), 100);
    for v in out {
        assert_abs_diff_eq!(v, 2.0, epsilon = FLOAT_EPSILON);
    }
}

#[test]
fn test_oscillator_tracks_pitch_cv() {
    // Range Lo at 1000 Hz sample rate: CV 12 is 2 Hz, so 500 samples per cycle.
    let engine = test_engine();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![
                Box::new(Osc::square(Polarity::POSITIVE, Range::Lo, 0.0)),
                constant(12.0, 1000),
            ],
        )
        .unwrap();

    let out = collect(&sink, 1000);
    engine.cancel(id).unwrap();
    let rising = out.windows(2).filter(|w| w[0] < 0.0 && w[1] > 0.0).count();
    assert_eq!(rising, 1);
    assert!((rms(&out) - 1.0).abs() < FLOAT_EPSILON);
}

#[test]
fn test_noise_through_vca_is_silenced_by_zero_cv() {
    let engine = test_engine();
    let vca = Vca::new();
    vca.control().write(&[0.0; 256]).unwrap();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![
                Box::new(vca),
                Box::new(Source::new(volta::LimitReader::new(Noise::new(Polarity::POSITIVE), 256))),
            ],
        )
        .unwrap();

    let out = collect(&sink, 256);
    engine.cancel(id).unwrap();
    assert!(is_silent(&out));
}

#[test]
fn test_small_chunks_still_deliver_everything() {
    let engine = VoltaEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .chunk_size(3)
        .build()
        .unwrap();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![Box::new(Probe::new()), Box::new(Probe::new()), constant(0.75, 50)],
        )
        .unwrap();

    let out = collect(&sink, 50);
    engine.cancel(id).unwrap();
    assert_eq!(out, vec![0.75; 50]);
    assert_eq!(sink.len(), 50);
}
