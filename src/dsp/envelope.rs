use crate::config::SynthConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator whose four parameters may change while it
runs. Everything is counted in ticks (one tick = one output sample).

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Off, Attack, Decay, Sustain or Release.

  gate        Note on/off signal. Any non-zero value is "high". A rising edge
              (zero -> non-zero) forces Attack, a falling edge forces Release,
              whatever stage we were in.

  duration    Stage length in whole ticks: seconds * sample_rate, truncated.
              Negative seconds count as zero.

  elapsed     Ticks spent in the current stage.

  rate        Per-tick change of `level` for the current stage.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release


Rates Follow the Remaining Time
-------------------------------

A rate is computed when a stage is entered, and again whenever the parameter
that owns the active stage changes:

    attack   rate =  (1 - level)       / remaining
    decay    rate = -(1 - sustain)     / remaining
    release  rate = -level             / remaining

    remaining = max(duration - elapsed, 1)

Because attack and release are measured from the CURRENT level, a retrigger
during Release ramps up from wherever the envelope is, and a release during
Attack ramps down from the partial level. No jumps, no clicks.

Turning the attack knob half way through an attack recomputes the slope so
the stage still ends on time.


Landing Exactly
---------------

Accumulating `level += rate` drifts by a few ulps, so every stage snaps its
target when the duration is used up:

    Attack  -> level = 1.0      stage = Decay
    Decay   -> level = sustain  stage = Sustain
    Release -> level = 0.0      stage = Off

The rising-edge tick is the first tick of the attack. With an attack of A
ticks the envelope reads exactly 1.0 on the A-th tick after the gate opened.
A zero-length stage snaps on the very tick it is entered.


    ┌─────┐ gate ↑  ┌────────┐ A ticks ┌───────┐ D ticks ┌─────────┐
    │ Off │ ──────→ │ Attack │ ──────→ │ Decay │ ──────→ │ Sustain │
    └─────┘         └────────┘         └───────┘         └─────────┘
       ↑                 │ gate ↓          │ gate ↓           │ gate ↓
       │  R ticks   ┌─────────┐ ←──────────┴──────────────────┘
       └─────────── │ Release │
                    └─────────┘ ── gate ↑ ──→ Attack (from current level)
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Off,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Per-tick envelope controls. Times are in seconds, `sustain` is a level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 1.0,
            sustain: 0.3,
            release: 1.0,
        }
    }
}

impl AdsrParams {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    config: SynthConfig,

    attack_ticks: u64,
    decay_ticks: u64,
    release_ticks: u64,
    sustain: f64,

    // Last raw parameter values; NaN so the first tick always applies them.
    seen: AdsrParams,

    stage: EnvelopeStage,
    level: f64,
    elapsed: u64,
    rate: f64,
    gate_high: bool,
}

impl Envelope {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            attack_ticks: 0,
            decay_ticks: 0,
            release_ticks: 0,
            sustain: 0.0,
            seen: AdsrParams::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN),
            stage: EnvelopeStage::Off,
            level: 0.0,
            elapsed: 0,
            rate: 0.0,
            gate_high: false,
        }
    }

    /// Advance one tick and return the new level.
    pub fn next(&mut self, params: AdsrParams, gate: f64) -> f64 {
        self.apply_params(params);
        self.apply_gate(gate != 0.0);

        match self.stage {
            EnvelopeStage::Attack => {
                self.step(self.attack_ticks);
                if self.elapsed >= self.attack_ticks {
                    self.level = 1.0;
                    self.enter(EnvelopeStage::Decay);
                }
            }
            EnvelopeStage::Decay => {
                self.step(self.decay_ticks);
                if self.elapsed >= self.decay_ticks {
                    self.level = self.sustain;
                    self.enter(EnvelopeStage::Sustain);
                }
            }
            EnvelopeStage::Release => {
                self.step(self.release_ticks);
                if self.elapsed >= self.release_ticks {
                    self.level = 0.0;
                    self.enter(EnvelopeStage::Off);
                }
            }
            EnvelopeStage::Sustain | EnvelopeStage::Off => {}
        }

        self.level
    }

    #[inline]
    fn step(&mut self, duration: u64) {
        if self.elapsed < duration {
            self.level += self.rate;
            self.elapsed += 1;
        }
    }

    fn apply_params(&mut self, params: AdsrParams) {
        // `!=` is also true against the NaN placeholders
        if params.attack != self.seen.attack {
            self.attack_ticks = self.config.seconds_to_ticks(params.attack);
            self.refresh_rate_if(EnvelopeStage::Attack);
        }
        if params.decay != self.seen.decay {
            self.decay_ticks = self.config.seconds_to_ticks(params.decay);
            self.refresh_rate_if(EnvelopeStage::Decay);
        }
        if params.sustain != self.seen.sustain {
            self.sustain = params.sustain.clamp(0.0, 1.0);
            self.refresh_rate_if(EnvelopeStage::Decay);
        }
        if params.release != self.seen.release {
            self.release_ticks = self.config.seconds_to_ticks(params.release);
            self.refresh_rate_if(EnvelopeStage::Release);
        }
        self.seen = params;
    }

    fn apply_gate(&mut self, high: bool) {
        if high == self.gate_high {
            return;
        }
        self.gate_high = high;
        if high {
            self.enter(EnvelopeStage::Attack);
        } else {
            self.enter(EnvelopeStage::Release);
        }
    }

    fn enter(&mut self, stage: EnvelopeStage) {
        self.stage = stage;
        self.elapsed = 0;
        self.refresh_rate();
    }

    #[inline]
    fn refresh_rate_if(&mut self, stage: EnvelopeStage) {
        if self.stage == stage {
            self.refresh_rate();
        }
    }

    fn refresh_rate(&mut self) {
        let remaining = |duration: u64, elapsed: u64| duration.saturating_sub(elapsed).max(1) as f64;
        self.rate = match self.stage {
            EnvelopeStage::Attack => (1.0 - self.level) / remaining(self.attack_ticks, self.elapsed),
            EnvelopeStage::Decay => -(1.0 - self.sustain) / remaining(self.decay_ticks, self.elapsed),
            EnvelopeStage::Release => -self.level / remaining(self.release_ticks, self.elapsed),
            EnvelopeStage::Sustain | EnvelopeStage::Off => 0.0,
        };
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
