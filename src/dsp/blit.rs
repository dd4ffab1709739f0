use std::f64::consts::PI;

use crate::config::SynthConfig;

/*
Band-Limited Impulse Trains
===========================

A naive sawtooth (phase ramp) has an instantaneous jump once per period. That
jump contains energy at every frequency, and everything above Nyquist folds
back down as inharmonic aliasing. BLIT synthesis avoids the jump: generate a
train of impulses that only contains harmonics below Nyquist, then integrate
it into the waveform you want.

Vocabulary
----------

  P       period in samples, sample_rate / hz (fractional)
  M       number of harmonics kept, the largest odd integer <= P
          (2 * floor(P / 2) + 1)
  phase   position inside the period, advanced by one sample per tick and
          wrapped back into [0, P)
  offset  fractional shift of the impulse inside the period, 0..1

The Impulse
-----------

                    sin(pi * x)
  sinc_M(x)  =  -------------------      (defined as 1 where the
                 M * sin(pi * x / M)       denominator vanishes)

  blit(offset) = (M / P) * sinc_M((phase - offset * P) * M / P)

The periodic sinc is the sum of M cosines, so the train is exactly band
limited. The M/P factor normalizes every impulse to unit area.

Shaping
-------

Both waveforms below are a leaky integrator fed by the impulse train:

  saw    y = a*y + blit(0) - 1/P         a = 1 - 1/P
         each impulse kicks y up by 1, the -1/P term pulls it down linearly
         across the period. A steady ramp from +0.5 to -0.5.

  pulse  y = a*y + blit(0) - blit(d)     a = 0.999
         a positive impulse at the start of the period and a negative one
         at duty d: integrated, a rectangle of width d.

The leak keeps numerical drift and DC from accumulating. Both outputs are
shifted up by 0.5 and clamped to [0, 1]: at startup the integrator has no
history and band-limited ringing overshoots a few percent around each edge.
*/

pub const MIN_BLIT_HZ: f64 = 1.0;
pub const PULSE_LEAK: f64 = 0.999;

/// Periodic sinc with `m` harmonics, 1 where the denominator vanishes.
#[inline]
pub fn periodic_sinc(x: f64, m: f64) -> f64 {
    let denominator = m * (PI * x / m).sin();
    if denominator == 0.0 {
        1.0
    } else {
        (PI * x).sin() / denominator
    }
}

#[derive(Debug, Clone)]
pub struct Blit {
    config: SynthConfig,
    phase: f64,
    period: f64,
    harmonics: f64,
}

impl Blit {
    pub fn new(config: SynthConfig) -> Self {
        let mut blit = Self {
            config,
            phase: 0.0,
            period: 1.0,
            harmonics: 1.0,
        };
        blit.set_frequency(MIN_BLIT_HZ);
        blit
    }

    /// Retune. The frequency is clamped to `[1 Hz, nyquist]` so the period
    /// stays finite and at least two samples long.
    #[inline]
    pub fn set_frequency(&mut self, hz: f64) {
        let hz = hz.clamp(MIN_BLIT_HZ, self.config.nyquist());
        self.period = self.config.sample_rate / hz;
        self.harmonics = 2.0 * (self.period * 0.5).floor() + 1.0;
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Impulse-train value at the current phase for an impulse shifted by
    /// `offset` periods.
    #[inline]
    pub fn at(&self, offset: f64) -> f64 {
        let ratio = self.harmonics / self.period;
        ratio * periodic_sinc((self.phase - offset * self.period) * ratio, self.harmonics)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.phase += 1.0;
        if self.phase >= self.period {
            self.phase -= self.period;
        }
    }

    /// One tick of the plain `offset = 0` train.
    #[inline]
    pub fn next(&mut self, hz: f64) -> f64 {
        self.set_frequency(hz);
        let value = self.at(0.0);
        self.advance();
        value
    }
}

/// Band-limited sawtooth: the impulse train through a period-tuned leaky integrator.
#[derive(Debug, Clone)]
pub struct BlitSaw {
    blit: Blit,
    integrator: f64,
}

impl BlitSaw {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            blit: Blit::new(config),
            integrator: 0.0,
        }
    }

    #[inline]
    pub fn next(&mut self, hz: f64) -> f64 {
        self.blit.set_frequency(hz);
        let inv_period = 1.0 / self.blit.period();
        let leak = 1.0 - inv_period;
        self.integrator = leak * self.integrator + self.blit.at(0.0) - inv_period;
        self.blit.advance();
        (self.integrator + 0.5).clamp(0.0, 1.0)
    }
}

/// Band-limited pulse: a positive and a negative impulse per period, integrated.
#[derive(Debug, Clone)]
pub struct BlitPulse {
    blit: Blit,
    integrator: f64,
}

impl BlitPulse {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            blit: Blit::new(config),
            integrator: 0.0,
        }
    }

    /// `duty` is the fraction of the period spent high, clamped to `[0, 1]`.
    #[inline]
    pub fn next(&mut self, hz: f64, duty: f64) -> f64 {
        let duty = duty.clamp(0.0, 1.0);
        self.blit.set_frequency(hz);
        let bipolar = self.blit.at(0.0) - self.blit.at(duty);
        self.integrator = PULSE_LEAK * self.integrator + bipolar;
        self.blit.advance();
        (self.integrator + 0.5).clamp(0.0, 1.0)
    }
}
