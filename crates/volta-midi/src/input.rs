//! Hardware MIDI input (requires the `midi-io` feature).

use crate::interface::NoteInterface;
use crate::{Error, Result};
use midir::{MidiInput, MidiInputConnection};
use tracing::debug;

/// Information about an available MIDI input device.
#[derive(Debug, Clone)]
pub struct MidiInputDevice {
    pub index: usize,
    pub name: String,
}

/// Open connection feeding a [`NoteInterface`]. Dropping it disconnects.
pub struct MidiInputPort {
    name: String,
    _connection: MidiInputConnection<()>,
}

impl MidiInputPort {
    pub fn list_devices() -> Result<Vec<MidiInputDevice>> {
        let midi_input = MidiInput::new("volta-device-list")?;
        Ok(midi_input
            .ports()
            .iter()
            .enumerate()
            .map(|(index, port)| MidiInputDevice {
                index,
                name: midi_input
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {index}")),
            })
            .collect())
    }

    /// Connect device `index` and route its note events into `interface`.
    pub fn connect(index: usize, mut interface: NoteInterface) -> Result<Self> {
        let midi_input = MidiInput::new("volta-midi-input")?;
        let ports = midi_input.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| Error::MidiDevice(format!("MIDI device {index} not found")))?;
        let name = midi_input
            .port_name(port)
            .unwrap_or_else(|_| format!("Device {index}"));

        let connection = midi_input.connect(
            port,
            "volta-input",
            move |_timestamp, message, _| {
                if let Err(e) = interface.handle_bytes(message) {
                    debug!("MIDI event not delivered: {}", e);
                }
            },
            (),
        )?;
        debug!(device = %name, "MIDI input connected");

        Ok(Self {
            name,
            _connection: connection,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
