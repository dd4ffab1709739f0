use crate::{
    config::SynthConfig,
    dsp::{
        blit::{Blit, BlitPulse, BlitSaw},
        oscillator::{unipolar_sine, Phasor},
    },
    graph::node::{wired, NodeId, SignalNode, Signals},
};

/*
Audio Oscillators
=================

Every oscillator takes its pitch from a frequency node carrying a normalized
value (0..1 of Nyquist) and converts it to Hz each tick, so pitch bends and
envelopes on the frequency input take effect immediately.

  SineOsc       table sine, amplitude-scaled, output in [0, amp]
                  out = amp * (sin(2 pi phase) * 0.5 + 0.5)
  RampOsc       the raw phase: a naive rising sawtooth in [0, 1). Aliases
                  badly as audio, fine as a slow modulation source.
  ImpulseTrain  band-limited impulse train (bipolar, unclamped). Mostly
                  useful to look at.
  SawOsc        BLIT sawtooth, [0, 1]
  PulseOsc      BLIT pulse with a duty input (0.5 = square), [0, 1]

Harmonic Content:
-----------------

Sine:   fundamental only
Saw:    every harmonic, amplitude 1/n, band-limited at Nyquist
Pulse:  at 50% duty odd harmonics only (1/n). Narrower pulses bring the
        even ones back and thin the sound out.

Example usage:
  let pitch = builder.add(Constant(config.hz_to_value(220.0)));
  let saw   = builder.add(SawOsc::new(config, pitch));
  let sq    = builder.add(PulseOsc::new(config, pitch).with_duty(width));
*/

pub struct SineOsc {
    config: SynthConfig,
    phasor: Phasor,
    frequency: NodeId,
    amplitude: Option<NodeId>,
}

impl SineOsc {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            phasor: Phasor::new(config),
            frequency,
            amplitude: None,
        }
    }

    pub fn with_amplitude(mut self, amplitude: NodeId) -> Self {
        self.amplitude = Some(amplitude);
        self
    }
}

impl SignalNode for SineOsc {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let hz = self.config.value_to_hz(signals.get(self.frequency));
        let phase = self.phasor.advance(hz);
        signals.get_or(self.amplitude, 1.0) * unipolar_sine(phase)
    }

    fn inputs(&self) -> Vec<NodeId> {
        wired([Some(self.frequency), self.amplitude])
    }

    fn name(&self) -> &'static str {
        "sine"
    }
}

pub struct RampOsc {
    config: SynthConfig,
    phasor: Phasor,
    frequency: NodeId,
}

impl RampOsc {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            phasor: Phasor::new(config),
            frequency,
        }
    }
}

impl SignalNode for RampOsc {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let hz = self.config.value_to_hz(signals.get(self.frequency));
        self.phasor.advance(hz)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.frequency]
    }

    fn name(&self) -> &'static str {
        "ramp"
    }
}

pub struct ImpulseTrain {
    config: SynthConfig,
    blit: Blit,
    frequency: NodeId,
}

impl ImpulseTrain {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            blit: Blit::new(config),
            frequency,
        }
    }
}

impl SignalNode for ImpulseTrain {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let hz = self.config.value_to_hz(signals.get(self.frequency));
        self.blit.next(hz)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.frequency]
    }

    fn name(&self) -> &'static str {
        "impulse_train"
    }
}

pub struct SawOsc {
    config: SynthConfig,
    saw: BlitSaw,
    frequency: NodeId,
}

impl SawOsc {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            saw: BlitSaw::new(config),
            frequency,
        }
    }
}

impl SignalNode for SawOsc {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let hz = self.config.value_to_hz(signals.get(self.frequency));
        self.saw.next(hz)
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.frequency]
    }

    fn name(&self) -> &'static str {
        "saw"
    }
}

pub struct PulseOsc {
    config: SynthConfig,
    pulse: BlitPulse,
    frequency: NodeId,
    duty: Option<NodeId>,
}

impl PulseOsc {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            pulse: BlitPulse::new(config),
            frequency,
            duty: None,
        }
    }

    pub fn with_duty(mut self, duty: NodeId) -> Self {
        self.duty = Some(duty);
        self
    }
}

impl SignalNode for PulseOsc {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let hz = self.config.value_to_hz(signals.get(self.frequency));
        let duty = signals.get_or(self.duty, 0.5);
        self.pulse.next(hz, duty)
    }

    fn inputs(&self) -> Vec<NodeId> {
        wired([Some(self.frequency), self.duty])
    }

    fn name(&self) -> &'static str {
        "pulse"
    }
}
