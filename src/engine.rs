//! VoltaEngine that owns the rack configuration and every running patch.

use crate::core::compat::Mutex;
use crate::core::{Config, PatchHandle, Processor, Rack, Writer};
use crate::{Error, Result};

/// Identifies a patch started by [`VoltaEngine::patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(u64);

impl PatchId {
    pub fn get(self) -> u64 {
        self.0
    }
}

struct Patches {
    running: Vec<(PatchId, PatchHandle)>,
    next_id: u64,
}

/// Runs patches against a shared [`Config`].
///
/// Dropping the engine cancels every patch it still owns.
///
/// # Example
///
/// ```ignore
/// use volta::prelude::*;
///
/// let engine = VoltaEngine::builder().sample_rate(48_000).build()?;
/// let sink = SharedBuffer::new();
/// let id = engine.patch(Box::new(sink.clone()), vec![Box::new(Source::new(Voltage::new(0.5)))])?;
/// engine.cancel(id)?;
/// ```
pub struct VoltaEngine {
    rack: Rack,
    patches: Mutex<Patches>,
}

impl VoltaEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::VoltaEngineBuilder {
        crate::VoltaEngineBuilder::default()
    }

    pub(crate) fn new(config: Config) -> Result<Self> {
        Ok(Self {
            rack: Rack::new(config)?,
            patches: Mutex::new(Patches {
                running: Vec::new(),
                next_id: 0,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        self.rack.config()
    }

    pub fn sample_rate(&self) -> u32 {
        self.rack.config().sample_rate
    }

    /// Wire and start a patch. See [`Rack::patch`].
    pub fn patch(&self, dst: Box<dyn Writer>, chain: Vec<Box<dyn Processor>>) -> Result<PatchId> {
        let handle = self.rack.patch(dst, chain)?;
        let mut patches = self.patches.lock();
        let id = PatchId(patches.next_id);
        patches.next_id += 1;
        patches.running.push((id, handle));
        tracing::debug!(id = id.0, "engine patch added");
        Ok(id)
    }

    /// Cancel one patch and return how it ended.
    pub fn cancel(&self, id: PatchId) -> Result<()> {
        let handle = {
            let mut patches = self.patches.lock();
            let pos = patches
                .running
                .iter()
                .position(|(pid, _)| *pid == id)
                .ok_or(Error::UnknownPatch(id.0))?;
            patches.running.remove(pos).1
        };
        Self::finish(handle)
    }

    /// Cancel every patch. All are cancelled; the first error is returned.
    pub fn cancel_all(&self) -> Result<()> {
        let handles: Vec<_> = std::mem::take(&mut self.patches.lock().running);
        let mut first = Ok(());
        for (id, handle) in handles {
            if let Err(e) = Self::finish(handle) {
                tracing::warn!(id = id.0, "patch ended with error: {}", e);
                if first.is_ok() {
                    first = Err(e);
                }
            }
        }
        first
    }

    /// Number of patches owned by the engine, finished or not.
    pub fn patch_count(&self) -> usize {
        self.patches.lock().running.len()
    }

    /// Whether the patch's worker has exited.
    pub fn is_finished(&self, id: PatchId) -> Result<bool> {
        self.patches
            .lock()
            .running
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, h)| h.is_finished())
            .ok_or(Error::UnknownPatch(id.0))
    }

    /// Remove patches whose worker already exited and report how each ended.
    pub fn reap(&self) -> Vec<(PatchId, Result<()>)> {
        let finished: Vec<_> = {
            let mut patches = self.patches.lock();
            let (done, running) = std::mem::take(&mut patches.running)
                .into_iter()
                .partition(|(_, h)| h.is_finished());
            patches.running = running;
            done
        };
        finished
            .into_iter()
            .map(|(id, handle)| (id, Self::finish(handle)))
            .collect()
    }

    /// Replace the configuration and push it to every running patch.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        self.rack = Rack::new(config)?;
        for (id, handle) in self.patches.lock().running.iter() {
            if let Err(e) = handle.set_config(config) {
                tracing::debug!(id = id.0, "patch not reconfigured: {}", e);
            }
        }
        Ok(())
    }

    /// List available output devices
    #[cfg(feature = "device")]
    pub fn list_output_devices() -> Result<Vec<String>> {
        Ok(crate::core::DeviceWriter::list_devices()?)
    }

    fn finish(mut handle: PatchHandle) -> Result<()> {
        Ok(handle.cancel()?)
    }
}

impl Drop for VoltaEngine {
    fn drop(&mut self) {
        if let Err(e) = self.cancel_all() {
            tracing::warn!("engine shutdown: {}", e);
        }
    }
}
