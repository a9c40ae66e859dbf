//! Latch: decouples a slow or irregular producer from a consumer running at
//! its own pace.
//!
//! A background thread drains the upstream reader and stores every sample
//! into an [`AtomicLatch`]. The output fills each requested block with the
//! most recent value. Until the upstream has produced its first sample a
//! read waits briefly and then returns `Ok(0)`, so the consumer never
//! observes the initial zero and a patch worker still sees cancellation.
//! Once the upstream ends the output ends too.

use crate::compat::{Arc, Mutex};
use crate::lockfree::{AtomicFlag, AtomicLatch};
use crate::sample::V;
use crate::stream::{Close, Processor, Reader, Writer};
use crate::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const LATCH_BLOCK: usize = 64;
const READY_POLL: Duration = Duration::from_millis(1);

struct LatchState {
    cell: AtomicLatch,
    done: AtomicFlag,
    error: Mutex<Option<Error>>,
}

/// Start latching `upstream` on a background thread.
///
/// The upstream should block while it has nothing to say (a
/// [`ChannelReader`](crate::ChannelReader) does); a reader that returns
/// `Ok(0)` ends the latch.
pub fn latch<R: Reader + 'static>(upstream: R) -> Result<LatchOutput> {
    let state = Arc::new(LatchState {
        cell: AtomicLatch::default(),
        done: AtomicFlag::new(false),
        error: Mutex::new(None),
    });
    let (ready_tx, ready_rx) = bounded(1);
    let worker = {
        let state = Arc::clone(&state);
        thread::Builder::new()
            .name("volta-latch".into())
            .spawn(move || drain(upstream, &state, ready_tx))?
    };
    tracing::debug!("latch started");
    Ok(LatchOutput {
        state,
        ready: Some(ready_rx),
        worker: Some(worker),
    })
}

fn drain<R: Reader>(mut upstream: R, state: &LatchState, ready: Sender<()>) {
    let mut ready = Some(ready);
    let mut buf = [0.0; LATCH_BLOCK];
    loop {
        if state.done.get() {
            break;
        }
        match upstream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for &v in &buf[..n.min(LATCH_BLOCK)] {
                    state.cell.store(v);
                }
                if let Some(tx) = ready.take() {
                    let _ = tx.send(());
                }
            }
            Err(e) => {
                tracing::warn!("latch upstream failed: {}", e);
                *state.error.lock() = Some(e);
                break;
            }
        }
    }
    state.done.set(true);
}

/// Reader end of a [`latch`].
pub struct LatchOutput {
    state: Arc<LatchState>,
    ready: Option<Receiver<()>>,
    worker: Option<JoinHandle<()>>,
}

impl LatchOutput {
    /// Block until the upstream produced its first sample.
    ///
    /// Returns `false` if the upstream ended without producing anything.
    pub fn wait_ready(&mut self) -> bool {
        if let Some(rx) = self.ready.take() {
            return rx.recv().is_ok();
        }
        true
    }

    /// Wait at most [`READY_POLL`] for the first sample. `true` once the
    /// upstream produced a sample or ended.
    fn poll_ready(&mut self) -> bool {
        let Some(rx) = &self.ready else {
            return true;
        };
        match rx.recv_timeout(READY_POLL) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.ready = None;
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    /// Current latched value, without waiting.
    pub fn value(&self) -> V {
        self.state.cell.load()
    }

    /// Whether the upstream has ended.
    pub fn is_done(&self) -> bool {
        self.state.done.get()
    }
}

impl Reader for LatchOutput {
    fn read(&mut self, buf: &mut [V]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.poll_ready() {
            return Ok(0);
        }
        if self.state.done.get() {
            if let Some(e) = self.state.error.lock().take() {
                return Err(e);
            }
            return Ok(0);
        }
        buf.fill(self.state.cell.load());
        Ok(buf.len())
    }
}

impl Writer for LatchOutput {
    fn write(&mut self, _buf: &[V]) -> Result<usize> {
        Err(Error::Unsupported("write to a latch output"))
    }

    fn closer(&mut self) -> Option<&mut dyn Close> {
        Some(self)
    }
}

impl Processor for LatchOutput {}

impl Close for LatchOutput {
    /// Stop republishing. The upstream thread is joined if it has already
    /// finished; one still blocked on its upstream is left to exit on its own.
    fn close(&mut self) -> Result<()> {
        self.state.done.set(true);
        if let Some(worker) = self.worker.take() {
            if worker.is_finished() {
                worker.join().map_err(|_| Error::WorkerPanicked)?;
            } else {
                tracing::debug!("latch upstream still blocked at close");
            }
        }
        Ok(())
    }
}

impl Drop for LatchOutput {
    fn drop(&mut self) {
        self.state.done.set(true);
    }
}
