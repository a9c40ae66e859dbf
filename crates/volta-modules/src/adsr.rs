//! ADSR envelope generator.
//!
//! Gate samples are written in, envelope samples are read out, one for one.
//! A gate above zero is note-on, zero or below is note-off.
//!
//! ```text
//! Idle --g>0--> Attack --done--> Decay --done--> Sustain
//!                 |                |                |
//!                 +------g<=0------+------g<=0------+--> Release --done--> Idle
//!                                                           |
//!                                          Attack <---g>0---+
//! ```
//!
//! Release always ramps down from the level the envelope had when the gate
//! fell, so cutting a note short during attack or decay does not jump.

use crate::{Error, Result};
use std::time::Duration;
use volta_core::{Config, Configurable, Processor, Reader, RingBuffer, Writer, V};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Envelope timings and sustain level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: Duration,
    pub decay: Duration,
    pub sustain: V,
    pub release: Duration,
    /// Release automatically this long after note-on, even if the gate is
    /// still high. The gate must fall before the next note-on.
    pub hold: Option<Duration>,
}

impl AdsrParams {
    pub fn new(attack: Duration, decay: Duration, sustain: V, release: Duration) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            hold: None,
        }
    }

    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(Error::InvalidParameter(format!(
                "sustain level {} outside [0, 1]",
                self.sustain
            )));
        }
        Ok(())
    }
}

/// Segment lengths in samples, derived from [`AdsrParams`] and a sample rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Lengths {
    attack: usize,
    decay: usize,
    release: usize,
    hold: Option<usize>,
}

impl Lengths {
    fn new(params: &AdsrParams, config: &Config) -> Self {
        Self {
            attack: config.samples_for(params.attack.as_secs_f64()),
            decay: config.samples_for(params.decay.as_secs_f64()),
            release: config.samples_for(params.release.as_secs_f64()),
            hold: params.hold.map(|d| config.samples_for(d.as_secs_f64())),
        }
    }
}

/// ADSR envelope as a gate-in, envelope-out processor.
pub struct Adsr {
    params: AdsrParams,
    lengths: Lengths,
    stage: Stage,
    elapsed: usize,
    since_note_on: usize,
    level: V,
    release_from: V,
    /// Set by an automatic release; cleared once the gate falls.
    wait_gate_low: bool,
    gate: RingBuffer,
}

impl Adsr {
    /// Envelope at the default sample rate until configured.
    pub fn new(params: AdsrParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            lengths: Lengths::new(&params, &Config::default()),
            stage: Stage::Idle,
            elapsed: 0,
            since_note_on: 0,
            level: 0.0,
            release_from: 0.0,
            wait_gate_low: false,
            gate: RingBuffer::new(),
        })
    }

    pub fn params(&self) -> &AdsrParams {
        &self.params
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Most recently emitted level.
    pub fn level(&self) -> V {
        self.level
    }

    /// Back to idle at zero.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.elapsed = 0;
        self.since_note_on = 0;
        self.level = 0.0;
        self.wait_gate_low = false;
        self.gate.reset();
    }

    /// Advance by one gate sample and return the envelope level.
    pub fn step(&mut self, gate: V) -> V {
        let mut on = gate > 0.0;
        if !on {
            self.wait_gate_low = false;
        } else if self.wait_gate_low {
            on = false;
        }
        self.level = self.next_level(on);
        self.level
    }

    fn enter(&mut self, stage: Stage) {
        match stage {
            Stage::Attack => self.since_note_on = 0,
            Stage::Release => self.release_from = self.level,
            _ => {}
        }
        self.stage = stage;
        self.elapsed = 0;
    }

    fn next_level(&mut self, on: bool) -> V {
        let sustain = self.params.sustain;
        match self.stage {
            Stage::Idle => {
                if on {
                    self.enter(Stage::Attack);
                }
                0.0
            }
            Stage::Attack => {
                if !on {
                    self.enter(Stage::Release);
                    return self.next_level(on);
                }
                self.since_note_on += 1;
                self.elapsed += 1;
                let len = self.lengths.attack;
                if self.elapsed >= len {
                    self.enter(Stage::Decay);
                    return 1.0;
                }
                self.elapsed as V / len as V
            }
            Stage::Decay => {
                if !on {
                    self.enter(Stage::Release);
                    return self.next_level(on);
                }
                self.since_note_on += 1;
                self.elapsed += 1;
                let len = self.lengths.decay;
                if self.elapsed >= len {
                    self.enter(Stage::Sustain);
                    return sustain;
                }
                1.0 - (1.0 - sustain) * self.elapsed as V / len as V
            }
            Stage::Sustain => {
                let expired = self
                    .lengths
                    .hold
                    .is_some_and(|hold| self.since_note_on >= hold);
                if expired {
                    self.wait_gate_low = true;
                }
                if !on || expired {
                    self.enter(Stage::Release);
                    return self.next_level(false);
                }
                self.since_note_on += 1;
                sustain
            }
            Stage::Release => {
                if on {
                    self.enter(Stage::Attack);
                    return self.next_level(on);
                }
                self.elapsed += 1;
                let len = self.lengths.release;
                if self.elapsed >= len {
                    self.enter(Stage::Idle);
                    return 0.0;
                }
                self.release_from * (1.0 - self.elapsed as V / len as V)
            }
        }
    }
}

impl Reader for Adsr {
    /// One envelope sample per buffered gate sample.
    fn read(&mut self, buf: &mut [V]) -> volta_core::Result<usize> {
        let n = self.gate.read_block(buf);
        for v in &mut buf[..n] {
            *v = self.step(*v);
        }
        Ok(n)
    }
}

impl Writer for Adsr {
    fn write(&mut self, buf: &[V]) -> volta_core::Result<usize> {
        Ok(self.gate.write_block(buf))
    }

    fn configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }
}

impl Processor for Adsr {}

impl Configurable for Adsr {
    fn set_config(&mut self, config: &Config) -> volta_core::Result<()> {
        self.lengths = Lengths::new(&self.params, config);
        tracing::debug!(
            attack = self.lengths.attack,
            decay = self.lengths.decay,
            release = self.lengths.release,
            "adsr configured"
        );
        Ok(())
    }
}
