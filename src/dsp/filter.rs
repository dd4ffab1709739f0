use std::f64::consts::{FRAC_1_SQRT_2, TAU};

use crate::config::SynthConfig;

/*
Resonant Low-Pass (biquad)
==========================

Second-order IIR low-pass derived from the analog prototype

           w0^2
  H(s) = -----------------------
          s^2 + (w0/Q) s + w0^2

through the bilinear transform (without pre-warping). With T = 1/sample_rate:

  M = w0^2 * Q * T^2
  J = 4Q + 2 w0 T + M

  b0 = M / J      b1 = 2M / J      b2 = M / J
  a1 = (2M - 8Q) / J
  a2 = (4Q - 2 w0 T + M) / J

  y0 = b0 x0 + b1 x1 + b2 x2 - a1 y1 - a2 y2

Controls
--------

  cutoff     normalized frequency (0..1 of Nyquist), w0 = 2 pi hz
  resonance  0..1, mapped to Q = resonance * 10 + 1/sqrt(2)
             (1/sqrt(2) is the Butterworth response, no peak)

Coefficients are only recomputed when cutoff or resonance moved since the
previous sample. A held knob costs five multiplies per sample.

The output is clamped to [0, 1], the engine's signal range. At high Q the
resonant peak would otherwise swing well outside it, and the clamped value is
also what gets fed back as history.
*/

/// Angular frequency used when the cutoff collapses to zero.
const MIN_OMEGA: f64 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    pub fn lowpass(hz: f64, resonance: f64, config: &SynthConfig) -> Self {
        let w0 = if hz > 0.0 { TAU * hz } else { MIN_OMEGA };
        let q = resonance * 10.0 + FRAC_1_SQRT_2;
        let t = config.inv_sample_rate();

        let m = w0 * w0 * q * t * t;
        let j = 4.0 * q + 2.0 * w0 * t + m;

        Self {
            b0: m / j,
            b1: 2.0 * m / j,
            b2: m / j,
            a1: (-8.0 * q + 2.0 * m) / j,
            a2: (4.0 * q - 2.0 * w0 * t + m) / j,
        }
    }

    /// Gain at DC, `(b0 + b1 + b2) / (1 + a1 + a2)`.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }
}

pub struct ResonantLowpass {
    config: SynthConfig,
    coefficients: BiquadCoefficients,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
    last_cutoff: f64,
    last_resonance: f64,
    coefficient_updates: u64,
}

impl ResonantLowpass {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            coefficients: BiquadCoefficients::lowpass(config.nyquist(), 0.0, &config),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            last_cutoff: f64::NAN,
            last_resonance: f64::NAN,
            coefficient_updates: 0,
        }
    }

    /// Filter one sample. `cutoff` is a normalized frequency.
    pub fn next(&mut self, input: f64, cutoff: f64, resonance: f64) -> f64 {
        if cutoff != self.last_cutoff || resonance != self.last_resonance {
            let hz = self.config.value_to_hz(cutoff);
            self.coefficients = BiquadCoefficients::lowpass(hz, resonance, &self.config);
            self.last_cutoff = cutoff;
            self.last_resonance = resonance;
            self.coefficient_updates += 1;
        }

        let c = &self.coefficients;
        let y0 = (c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2)
            .clamp(0.0, 1.0);

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = y0;

        y0
    }

    /// How many times the coefficients have been recomputed.
    pub fn coefficient_updates(&self) -> u64 {
        self.coefficient_updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::math::sin_cycles;

    fn filter() -> (SynthConfig, ResonantLowpass) {
        let config = SynthConfig::default();
        (config, ResonantLowpass::new(config))
    }

    #[test]
    fn coefficients_have_unity_dc_gain() {
        let config = SynthConfig::default();
        for hz in [50.0, 1_000.0, 10_000.0] {
            for resonance in [0.0, 0.5, 0.9] {
                let c = BiquadCoefficients::lowpass(hz, resonance, &config);
                assert!((c.dc_gain() - 1.0).abs() < 1e-9, "{hz} Hz / {resonance}");
            }
        }
    }

    #[test]
    fn recomputes_only_when_controls_move() {
        let (config, mut lpf) = filter();
        let cutoff = config.hz_to_value(1_000.0);

        for _ in 0..100 {
            lpf.next(0.5, cutoff, 0.2);
        }
        assert_eq!(lpf.coefficient_updates(), 1);

        lpf.next(0.5, cutoff * 0.5, 0.2);
        assert_eq!(lpf.coefficient_updates(), 2);

        lpf.next(0.5, cutoff * 0.5, 0.3);
        assert_eq!(lpf.coefficient_updates(), 3);

        for _ in 0..100 {
            lpf.next(0.5, cutoff * 0.5, 0.3);
        }
        assert_eq!(lpf.coefficient_updates(), 3);
    }

    #[test]
    fn settles_to_constant_input() {
        let (config, mut lpf) = filter();
        let cutoff = config.hz_to_value(2_000.0);
        let mut y = 0.0;
        for _ in 0..4_800 {
            y = lpf.next(0.7, cutoff, 0.0);
        }
        assert!((y - 0.7).abs() < 1e-6, "settled at {y}");
    }

    #[test]
    fn attenuates_above_cutoff() {
        let (config, mut lpf) = filter();
        let cutoff = config.hz_to_value(200.0);
        let step = 8_000.0 / config.sample_rate;

        let mut phase = 0.0;
        let mut peak: f64 = 0.0;
        for i in 0..9_600 {
            let input = 0.5 + 0.5 * sin_cycles(phase);
            phase += step;
            let y = lpf.next(input, cutoff, 0.0);
            if i > 4_800 {
                peak = peak.max((y - 0.5).abs());
            }
        }
        assert!(peak < 0.01, "8 kHz leaked through a 200 Hz low-pass: {peak}");
    }

    #[test]
    fn output_is_clamped_at_high_resonance() {
        let (config, mut lpf) = filter();
        let cutoff = config.hz_to_value(500.0);
        for i in 0..48_000 {
            let input = if (i / 48) % 2 == 0 { 1.0 } else { 0.0 };
            let y = lpf.next(input, cutoff, 1.0);
            assert!((0.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn zero_cutoff_does_not_blow_up() {
        let (_, mut lpf) = filter();
        for _ in 0..1_000 {
            let y = lpf.next(1.0, 0.0, 0.5);
            assert!(y.is_finite());
        }
    }
}
