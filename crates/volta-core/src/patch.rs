//! Patch orchestration: wire a chain of processors into a destination and
//! pump samples through it on a dedicated worker thread.
//!
//! Data flows from the last element of the chain toward element 0 and from
//! there into the destination. The last element is the producer; its `write`
//! is never called. Each pass moves at most one chunk (`Config::chunk_size`)
//! per stage, so a single fast producer cannot starve the rest of the chain.
//!
//! Teardown closes the destination first, then every chain element in order,
//! each exactly once.

use crate::compat::Arc;
use crate::config::Config;
use crate::copy::{copy_buffer, LimitReader};
use crate::lockfree::AtomicFlag;
use crate::sample::V;
use crate::stream::{Processor, Writer};
use crate::{Error, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, SendError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Idle passes spent yielding before the worker starts sleeping.
const IDLE_SPINS: u32 = 16;
const IDLE_SLEEP: Duration = Duration::from_micros(250);

enum Command {
    SetConfig(Config),
}

/// Holds the global configuration and wires patches with it.
#[derive(Debug, Clone)]
pub struct Rack {
    config: Config,
}

impl Rack {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wire `chain` into `dst` and start pumping.
    pub fn patch(
        &self,
        dst: Box<dyn Writer>,
        chain: Vec<Box<dyn Processor>>,
    ) -> Result<PatchHandle> {
        patch(&self.config, dst, chain)
    }
}

impl Default for Rack {
    fn default() -> Self {
        Self {
            config: Config::default(),
        }
    }
}

/// Configure every element, then spawn the worker.
///
/// If any element fails to configure, or the worker cannot be started,
/// everything is closed and the error is returned before a worker runs.
pub fn patch(
    config: &Config,
    dst: Box<dyn Writer>,
    chain: Vec<Box<dyn Processor>>,
) -> Result<PatchHandle> {
    config.validate()?;
    let mut pipeline = Pipeline::new(dst, chain, config.chunk_size);

    if let Err(e) = pipeline.configure(config) {
        return Err(abort(pipeline, e));
    }

    let cancel = Arc::new(AtomicFlag::new(false));
    let (commands_tx, commands_rx) = unbounded();
    let stages = pipeline.chain.len();

    // The pipeline is handed over only once the thread exists, so a failed
    // spawn still leaves it here to be closed.
    let (start_tx, start_rx) = bounded::<Pipeline>(1);
    let spawned = {
        let cancel = Arc::clone(&cancel);
        thread::Builder::new()
            .name("volta-patch".into())
            .spawn(move || match start_rx.recv() {
                Ok(pipeline) => run(pipeline, &cancel, &commands_rx),
                Err(_) => Ok(()),
            })
    };
    let worker = match spawned {
        Ok(worker) => worker,
        Err(e) => return Err(abort(pipeline, e.into())),
    };
    if let Err(SendError(pipeline)) = start_tx.send(pipeline) {
        return Err(abort(pipeline, Error::WorkerPanicked));
    }
    tracing::debug!(stages, chunk = config.chunk_size, "patch started");

    Ok(PatchHandle {
        cancel,
        commands: commands_tx,
        worker: Some(worker),
    })
}

/// Close everything wired so far and hand back the error that stopped wiring.
fn abort(mut pipeline: Pipeline, err: Error) -> Error {
    tracing::warn!("patch wiring failed: {}", err);
    if let Some(close_err) = pipeline.close() {
        tracing::warn!("close after failed wiring: {}", close_err);
    }
    err
}

struct Pipeline {
    dst: Box<dyn Writer>,
    chain: Vec<Box<dyn Processor>>,
    scratch: Vec<V>,
}

impl Pipeline {
    fn new(dst: Box<dyn Writer>, chain: Vec<Box<dyn Processor>>, chunk: usize) -> Self {
        Self {
            dst,
            chain,
            scratch: vec![0.0; chunk],
        }
    }

    /// Destination first, then the chain front to back. Stops at the first
    /// failure.
    fn configure(&mut self, config: &Config) -> Result<()> {
        if let Some(c) = self.dst.configurable() {
            c.set_config(config)?;
        }
        for stage in self.chain.iter_mut() {
            if let Some(c) = stage.configurable() {
                c.set_config(config)?;
            }
        }
        self.scratch.resize(config.chunk_size, 0.0);
        Ok(())
    }

    /// One pass over every stage, producer end first. Returns the number of
    /// samples moved.
    fn pass(&mut self, cancel: &AtomicFlag) -> Result<u64> {
        let Pipeline {
            dst,
            chain,
            scratch,
        } = self;
        let chunk = scratch.len();
        let mut moved = 0;

        for i in (1..chain.len()).rev() {
            if cancel.get() {
                return Ok(moved);
            }
            let (head, tail) = chain.split_at_mut(i);
            let src = &mut tail[0];
            let buf = &mut scratch[..block_for(src.block_size(), chunk)];
            moved += copy_buffer(&mut head[i - 1], &mut LimitReader::new(src, chunk), buf)?;
        }

        if let Some(first) = chain.first_mut() {
            if cancel.get() {
                return Ok(moved);
            }
            let buf = &mut scratch[..block_for(first.block_size(), chunk)];
            moved += copy_buffer(dst, &mut LimitReader::new(first, chunk), buf)?;
        }
        Ok(moved)
    }

    /// Close the destination, then every element in order. Every close is
    /// attempted; the first failure is returned.
    fn close(&mut self) -> Option<Error> {
        let mut first = None;
        if let Some(c) = self.dst.closer() {
            if let Err(e) = c.close() {
                tracing::warn!("destination close failed: {}", e);
                first.get_or_insert(e);
            }
        }
        for (i, stage) in self.chain.iter_mut().enumerate() {
            if let Some(c) = stage.closer() {
                if let Err(e) = c.close() {
                    tracing::warn!(stage = i, "close failed: {}", e);
                    first.get_or_insert(e);
                }
            }
        }
        first
    }
}

fn block_for(hint: usize, chunk: usize) -> usize {
    match hint {
        0 => chunk,
        b => b.min(chunk),
    }
}

fn run(mut pipeline: Pipeline, cancel: &AtomicFlag, commands: &Receiver<Command>) -> Result<()> {
    let loop_result = pump(&mut pipeline, cancel, commands);
    let close_err = pipeline.close();
    tracing::debug!("patch stopped");
    loop_result?;
    match close_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn pump(pipeline: &mut Pipeline, cancel: &AtomicFlag, commands: &Receiver<Command>) -> Result<()> {
    if pipeline.chain.is_empty() {
        return Ok(());
    }
    let mut idle = 0u32;
    while !cancel.get() {
        loop {
            match commands.try_recv() {
                Ok(Command::SetConfig(config)) => {
                    tracing::debug!(sample_rate = config.sample_rate, "patch reconfigured");
                    pipeline.configure(&config)?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        match pipeline.pass(cancel) {
            Ok(0) => {
                idle = idle.saturating_add(1);
                if idle < IDLE_SPINS {
                    thread::yield_now();
                } else {
                    thread::sleep(IDLE_SLEEP);
                }
            }
            Ok(_) => idle = 0,
            Err(e) => {
                tracing::warn!("patch stopped on error: {}", e);
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Handle to a running patch.
///
/// Dropping the handle cancels the patch.
pub struct PatchHandle {
    cancel: Arc<AtomicFlag>,
    commands: Sender<Command>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl PatchHandle {
    /// Stop the worker, wait for it, and close every element.
    ///
    /// Returns the error that stopped the worker, or the first close failure.
    /// Calling it again returns `Ok(())`.
    pub fn cancel(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.cancel.set(true);
        match worker.join() {
            Ok(result) => result,
            Err(_) => Err(Error::WorkerPanicked),
        }
    }

    /// Push a new configuration to every element from the worker thread.
    pub fn set_config(&self, config: Config) -> Result<()> {
        config.validate()?;
        self.commands
            .send(Command::SetConfig(config))
            .map_err(|_| Error::Closed)
    }

    /// Whether the worker has exited, either cancelled or on error.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }
}

impl Drop for PatchHandle {
    fn drop(&mut self) {
        if let Err(e) = self.cancel() {
            tracing::warn!("patch ended with error: {}", e);
        }
    }
}
