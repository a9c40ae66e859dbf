//! Note events parsed from raw MIDI bytes.

use crate::{Error, Result};
use midi_msg::{ChannelVoiceMsg, MidiMsg};
use serde::{Deserialize, Serialize};

/// A note message on one of the 16 channels (`0..=15`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Parse one message. A note-on with velocity zero is a note-off.
    ///
    /// Messages other than note-on/note-off are [`Error::Unsupported`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (msg, _len) = MidiMsg::from_midi(bytes)?;
        match msg {
            MidiMsg::ChannelVoice { channel, msg } => {
                let channel = channel as u8;
                match msg {
                    ChannelVoiceMsg::NoteOn { note, velocity: 0 }
                    | ChannelVoiceMsg::NoteOff { note, velocity: _ } => Ok(MidiEvent::NoteOff {
                        channel,
                        key: note,
                        velocity: 0,
                    }),
                    ChannelVoiceMsg::NoteOn { note, velocity } => Ok(MidiEvent::NoteOn {
                        channel,
                        key: note,
                        velocity,
                    }),
                    _ => Err(Error::Unsupported("channel voice message other than note")),
                }
            }
            _ => Err(Error::Unsupported("expected a channel voice message")),
        }
    }

    pub fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        }
    }

    pub fn note_off(channel: u8, key: u8) -> Self {
        MidiEvent::NoteOff {
            channel,
            key,
            velocity: 0,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }

    pub fn key(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => key,
        }
    }

    /// Raw 3-byte encoding.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => [0x90 | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => [0x80 | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
        }
    }
}
