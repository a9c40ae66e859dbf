//! Splits note events into gate, key and velocity streams.
//!
//! The streams are trigger-rate: a sample is emitted per note event, not per
//! audio sample. Latch them before feeding an envelope or oscillator that
//! runs at audio rate.

use crate::event::MidiEvent;
use crate::Result;
use volta_core::{ChannelReader, ChannelWriter, V};

/// Reader ends of a [`NoteInterface`].
pub struct NoteStreams {
    /// `1.0` on note-on, `0.0` on note-off.
    pub gate: ChannelReader,
    /// MIDI key of each note-on.
    pub key: ChannelReader,
    /// Note-on velocity scaled to `0..=1`; `0.0` on note-off.
    pub velocity: ChannelReader,
}

/// Monophonic note input for one MIDI channel.
pub struct NoteInterface {
    channel: u8,
    gate: ChannelWriter,
    key: ChannelWriter,
    velocity: ChannelWriter,
    dropped: u64,
}

impl NoteInterface {
    /// Listen on `channel` (`0..=15`). Each stream buffers up to `capacity`
    /// values before further events are dropped.
    pub fn new(channel: u8, capacity: usize) -> (Self, NoteStreams) {
        let (gate_tx, gate_rx) = volta_core::channel(capacity);
        let (key_tx, key_rx) = volta_core::channel(capacity);
        let (vel_tx, vel_rx) = volta_core::channel(capacity);
        (
            Self {
                channel,
                gate: gate_tx,
                key: key_tx,
                velocity: vel_tx,
                dropped: 0,
            },
            NoteStreams {
                gate: gate_rx,
                key: key_rx,
                velocity: vel_rx,
            },
        )
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Values dropped because a stream was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Apply one event. Returns `false` for events on other channels.
    ///
    /// Never blocks; fails with `Closed` once the streams are dropped.
    pub fn handle(&mut self, event: MidiEvent) -> Result<bool> {
        if event.channel() != self.channel {
            return Ok(false);
        }
        match event {
            MidiEvent::NoteOn { key, velocity, .. } => {
                self.push(Stream::Gate, 1.0)?;
                self.push(Stream::Key, key as V)?;
                self.push(Stream::Velocity, velocity as V / 127.0)?;
            }
            MidiEvent::NoteOff { .. } => {
                self.push(Stream::Gate, 0.0)?;
                self.push(Stream::Velocity, 0.0)?;
            }
        }
        Ok(true)
    }

    /// Parse and apply raw bytes. Unsupported messages are skipped.
    pub fn handle_bytes(&mut self, bytes: &[u8]) -> Result<bool> {
        match MidiEvent::from_bytes(bytes) {
            Ok(event) => self.handle(event),
            Err(e) => {
                tracing::debug!("ignoring MIDI message: {}", e);
                Ok(false)
            }
        }
    }

    fn push(&mut self, stream: Stream, v: V) -> Result<()> {
        let tx = match stream {
            Stream::Gate => &self.gate,
            Stream::Key => &self.key,
            Stream::Velocity => &self.velocity,
        };
        if !tx.try_send(v)? {
            self.dropped += 1;
            tracing::debug!(?stream, "note stream full, dropping value");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Gate,
    Key,
    Velocity,
}
