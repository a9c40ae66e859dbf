//! Envelopes driving amplifiers, and MIDI notes driving envelopes.

use std::time::Duration;
use volta::prelude::*;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::tolerances::*;
use helpers::*;

fn params() -> AdsrParams {
    // One sample per millisecond at the test rate.
    AdsrParams::new(
        Duration::from_millis(4),
        Duration::from_millis(4),
        0.5,
        Duration::from_millis(4),
    )
}

#[test]
fn test_adsr_in_patch() {
    let engine = test_engine();
    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![Box::new(Adsr::new(params()).unwrap()), gate_high(12)],
        )
        .unwrap();

    let out = collect(&sink, 12);
    engine.cancel(id).unwrap();
    let expected = [0.0, 0.25, 0.5, 0.75, 1.0, 0.875, 0.75, 0.625, 0.5, 0.5, 0.5, 0.5];
    for (got, want) in out.iter().zip(expected) {
        assert!((got - want).abs() < FLOAT_EPSILON, "got {got}, want {want}");
    }
}

#[test]
fn test_adsr_shapes_vca_output() {
    let engine = test_engine();
    let mut vca = Vca::new();
    let id = engine
        .patch(
            Box::new(vca.control()),
            vec![Box::new(Adsr::new(params()).unwrap()), gate_high(12)],
        )
        .unwrap();
    wait_for("envelope to reach the VCA", || vca.buffered().1 >= 12);
    engine.cancel(id).unwrap();

    vca.write(&[2.0; 12]).unwrap();
    let mut out = [0.0; 12];
    assert_eq!(vca.read(&mut out).unwrap(), 12);
    assert!((peak(&out) - 2.0).abs() < FLOAT_EPSILON);
    assert!((out[11] - 1.0).abs() < FLOAT_EPSILON);
}

#[test]
fn test_midi_note_drives_latched_gate_and_key() {
    let (mut notes, streams) = NoteInterface::new(0, 16);
    let mut gate = volta::latch(streams.gate).unwrap();
    let mut key = volta::latch(streams.key).unwrap();
    let velocity = volta::latch(streams.velocity).unwrap();

    assert!(notes.handle(MidiEvent::note_on(0, 69, 127)).unwrap());
    assert!(gate.wait_ready() && key.wait_ready());
    assert_eq!(gate.value(), 1.0);
    assert_eq!(key.value(), 69.0);
    wait_for("velocity", || velocity.value() == 1.0);

    // Other channels are ignored.
    assert!(!notes.handle(MidiEvent::note_off(3, 69)).unwrap());

    assert!(notes.handle_bytes(&[0x80, 69, 0]).unwrap());
    wait_for("gate to fall", || gate.value() == 0.0);
    assert_eq!(key.value(), 69.0);
    assert_eq!(notes.dropped(), 0);

    drop(notes);
    wait_for("streams to end", || gate.is_done() && key.is_done());
}

#[test]
fn test_midi_key_plays_oscillator_pitch() {
    // Key 69 at R8 with standard fine tuning is 440 Hz.
    let engine = VoltaEngine::builder().sample_rate(44_100).chunk_size(64).build().unwrap();
    let (mut notes, streams) = NoteInterface::new(0, 16);
    let key = volta::latch(streams.key).unwrap();
    notes.handle(MidiEvent::note_on(0, 69, 100)).unwrap();

    let sink = SharedBuffer::new();
    let id = engine
        .patch(
            Box::new(sink.clone()),
            vec![
                Box::new(Osc::square(Polarity::POSITIVE, Range::R8, fine(&StdTuning))),
                Box::new(Source::new(volta::LimitReader::new(key, 44_100))),
            ],
        )
        .unwrap();

    let out = collect(&sink, 44_100);
    engine.cancel(id).unwrap();
    drop(notes);

    let rising = out.windows(2).filter(|w| w[0] < 0.0 && w[1] > 0.0).count();
    assert!((439..=441).contains(&rising), "{rising} cycles in one second");
    assert!((rms(&out) - 1.0).abs() < DSP_EPSILON);
}
