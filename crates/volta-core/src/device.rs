//! Audio device sink (requires the `device` feature).
//!
//! [`DeviceWriter`] is a destination [`Writer`]: samples written to it are
//! pushed into a lock-free ring that the device callback drains. When the
//! ring is full, `write` waits, so the device clock paces the whole patch.
//! The callback plays silence on underrun.

use crate::compat::Arc;
use crate::config::Config;
use crate::lockfree::AtomicFlag;
use crate::sample::V;
use crate::stream::{Close, Configurable, Writer};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::time::Duration;

const FULL_WAIT: Duration = Duration::from_millis(1);

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. The stream is only
/// created, paused and dropped by the single owner of the `DeviceWriter`.
struct StreamHandle(cpal::Stream);

unsafe impl Send for StreamHandle {}

/// Mono output to a sound card. Every device channel gets the same signal.
pub struct DeviceWriter {
    device_index: Option<usize>,
    stream: Option<StreamHandle>,
    producer: Option<HeapProd<f32>>,
    channels: usize,
    underruns: Arc<AtomicFlag>,
}

impl DeviceWriter {
    /// Writer for the default output device.
    pub fn new() -> Self {
        Self::with_device(None)
    }

    /// Writer for the device at `index` in [`DeviceWriter::list_devices`].
    pub fn with_device(device_index: Option<usize>) -> Self {
        Self {
            device_index,
            stream: None,
            producer: None,
            channels: 0,
            underruns: Arc::new(AtomicFlag::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Channel count of the open stream, or zero when not running.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Whether the callback ran dry since the last call.
    pub fn take_underrun(&self) -> bool {
        self.underruns.swap(false)
    }

    pub fn device_name(&self) -> Result<String> {
        Ok(get_device(self.device_index)?.name()?)
    }

    pub fn list_devices() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, d)| Ok(format!("{i}: {}", d.name()?)))
            .collect()
    }

    fn open(&mut self, config: &Config) -> Result<()> {
        let device = get_device(self.device_index)?;
        let supported = device.default_output_config()?;
        let mut stream_config: cpal::StreamConfig = supported.config();
        stream_config.sample_rate = cpal::SampleRate(config.sample_rate);

        let (producer, consumer) = HeapRb::<f32>::new(config.device_buffer_size).split();
        let underruns = Arc::clone(&self.underruns);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, consumer, underruns)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, consumer, underruns)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, consumer, underruns)?
            }
            format => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };
        stream.play()?;

        tracing::debug!(
            sample_rate = config.sample_rate,
            channels = stream_config.channels,
            ring = config.device_buffer_size,
            "device stream started"
        );
        self.channels = stream_config.channels as usize;
        self.producer = Some(producer);
        self.stream = Some(StreamHandle(stream));
        Ok(())
    }
}

impl Default for DeviceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for DeviceWriter {
    fn write(&mut self, buf: &[V]) -> Result<usize> {
        let producer = self.producer.as_mut().ok_or(Error::Closed)?;
        let mut pending = buf;
        let mut block = [0.0f32; 256];
        while !pending.is_empty() {
            let vacant = producer.vacant_len();
            if vacant == 0 {
                std::thread::sleep(FULL_WAIT);
                continue;
            }
            let n = pending.len().min(vacant).min(block.len());
            for (dst, &v) in block[..n].iter_mut().zip(pending) {
                *dst = v.clamp(-1.0, 1.0) as f32;
            }
            let pushed = producer.push_slice(&block[..n]);
            pending = &pending[pushed..];
        }
        Ok(buf.len())
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }

    fn closer(&mut self) -> Option<&mut dyn Close> {
        Some(self)
    }
}

impl Configurable for DeviceWriter {
    /// Opens (or reopens) the device stream at the configured rate.
    fn set_config(&mut self, config: &Config) -> Result<()> {
        self.close()?;
        self.open(config)
    }
}

impl Close for DeviceWriter {
    fn close(&mut self) -> Result<()> {
        self.producer = None;
        self.channels = 0;
        if let Some(StreamHandle(stream)) = self.stream.take() {
            stream.pause()?;
            tracing::debug!("device stream stopped");
        }
        Ok(())
    }
}

fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: HeapCons<f32>,
    underruns: Arc<AtomicFlag>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    // Grows on the first callback, then stable.
    let mut mono = Vec::<f32>::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / channels;
            if mono.len() < frames {
                mono.resize(frames, 0.0);
            }
            let got = consumer.pop_slice(&mut mono[..frames]);
            if got < frames {
                mono[got..frames].fill(0.0);
                underruns.set(true);
            }
            write_output(data, channels, &mono[..frames]);
        },
        |err| tracing::warn!("device stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Duplicate the mono signal to every channel.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    mono: &[f32],
) {
    for (frame, &value) in data.chunks_mut(channels).zip(mono) {
        for sample in frame.iter_mut() {
            *sample = T::from_sample(value);
        }
    }
}
