use crate::{config::SynthConfig, dsp::math::sin_cycles};

/// Phase accumulator in cycles. Advances by `hz / sample_rate` and wraps into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct Phasor {
    config: SynthConfig,
    phase: f64,
}

impl Phasor {
    pub fn new(config: SynthConfig) -> Self {
        Self { config, phase: 0.0 }
    }

    /// Step forward one tick and return the new phase.
    #[inline]
    pub fn advance(&mut self, hz: f64) -> f64 {
        self.phase += hz * self.config.inv_sample_rate();
        if self.phase >= 1.0 || self.phase < 0.0 {
            self.phase -= self.phase.floor();
        }
        self.phase
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }
}

/// Table sine mapped into `[0, 1]`.
#[inline]
pub fn unipolar_sine(phase: f64) -> f64 {
    sin_cycles(phase) * 0.5 + 0.5
}
