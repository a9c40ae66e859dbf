//! Fan-out through a mult and latched control streams.

use volta::prelude::*;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::*;

fn ramp(n: usize) -> Box<dyn Processor> {
    let mut next = 0.0;
    let counter = FuncSource::new(move || {
        let v = next;
        next += 1.0;
        v
    });
    Box::new(Source::new(volta::LimitReader::new(counter, n)))
}

#[test]
fn test_mult_feeds_every_output() {
    let engine = test_engine();
    let mult = Mult::new();
    let a = mult.output();
    let b = mult.output();
    assert_eq!(mult.outputs(), 2);

    let id = engine.patch(Box::new(mult.clone()), vec![ramp(100)]).unwrap();
    wait_for("both outputs to fill", || a.len() >= 100 && b.len() >= 100);
    engine.cancel(id).unwrap();

    let expected: Vec<V> = (0..100).map(|i| i as V).collect();
    for mut out in [a, b] {
        let mut buf = vec![0.0; 128];
        let n = out.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], &expected[..]);
    }
    assert_eq!(mult.outputs(), 0);
}

#[test]
fn test_mult_outputs_drive_separate_patches() {
    let engine = test_engine();
    let mult = Mult::new();
    let left = SharedBuffer::new();
    let right = SharedBuffer::new();

    engine
        .patch(
            Box::new(left.clone()),
            vec![Box::new(Shaper::new(|v| v * 0.5)), Box::new(mult.output())],
        )
        .unwrap();
    engine
        .patch(
            Box::new(right.clone()),
            vec![Box::new(Shaper::new(|v| -v)), Box::new(mult.output())],
        )
        .unwrap();
    engine.patch(Box::new(mult.clone()), vec![ramp(40)]).unwrap();

    let l = collect(&left, 40);
    let r = collect(&right, 40);
    engine.cancel_all().unwrap();
    for i in 0..40 {
        assert_eq!(l[i], i as V * 0.5);
        assert_eq!(r[i], -(i as V));
    }
}

#[test]
fn test_latch_republishes_latest_value() {
    let engine = test_engine();
    let (tx, rx) = volta::channel(4);
    let mut out = volta::latch(rx).unwrap();

    tx.send(0.25).unwrap();
    assert!(out.wait_ready());
    assert_eq!(out.value(), 0.25);

    let sink = SharedBuffer::new();
    let id = engine.patch(Box::new(sink.clone()), vec![Box::new(out)]).unwrap();
    assert!(collect(&sink, 64).iter().all(|&v| v == 0.25));

    tx.send(0.75).unwrap();
    wait_for("latched value to change", || {
        sink.drain().last().copied() == Some(0.75)
    });

    drop(tx);
    engine.cancel(id).unwrap();
}

#[test]
fn test_latch_ends_with_upstream() {
    let engine = test_engine();
    let (tx, rx) = volta::channel(4);
    let out = volta::latch(rx).unwrap();
    tx.send(1.0).unwrap();
    drop(tx);

    let id = engine
        .patch(Box::new(SharedBuffer::new()), vec![Box::new(out)])
        .unwrap();
    // The worker keeps idling on end-of-stream; cancel still succeeds.
    engine.cancel(id).unwrap();
}

#[test]
fn test_latch_patch_cancels_before_first_value() {
    let engine = test_engine();
    let (tx, rx) = volta::channel(4);
    let out = volta::latch(rx).unwrap();
    let sink = SharedBuffer::new();
    let id = engine.patch(Box::new(sink.clone()), vec![Box::new(out)]).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = done_tx.send(engine.cancel(id).is_ok());
    });
    let cancelled = done_rx.recv_timeout(TEST_TIMEOUT);
    assert_eq!(cancelled, Ok(true));
    assert!(sink.is_empty());
    drop(tx);
}
