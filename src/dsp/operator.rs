use crate::{config::SynthConfig, dsp::math::sin_cycles};

/// A phase-modulation operator: a sine oscillator whose phase can be pushed
/// around by other operators.
///
/// The operator tracks phase in cycles and runs at `base_hz * ratio`. It does
/// not know about modulation itself; callers read [`phase`](Self::phase) and
/// add their own offset, which is what lets one operator feed several others
/// on the same tick.
#[derive(Debug, Clone)]
pub struct Operator {
    config: SynthConfig,
    phase: f64,
}

impl Operator {
    pub fn new(config: SynthConfig) -> Self {
        Self { config, phase: 0.0 }
    }

    /// Move the phase forward by one tick at `base_hz * ratio`.
    #[inline]
    pub fn advance(&mut self, base_hz: f64, ratio: f64) {
        self.phase += base_hz * ratio * self.config.inv_sample_rate();
        self.phase -= self.phase.floor();
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Unscaled sine at the current phase with `offset` cycles added.
    #[inline]
    pub fn sine(&self, offset: f64) -> f64 {
        sin_cycles(self.phase + offset)
    }
}
