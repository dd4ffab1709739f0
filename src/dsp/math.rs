use std::f64::consts::TAU;

use once_cell::sync::Lazy;

/*
Table Sine and Fast Powers
==========================

Every oscillator in the engine reads its sine from one shared table instead of
calling `f64::sin` per sample.

  index = (phase * LEN) as int & (LEN - 1)

LEN is a power of two, so the mask wraps any phase (negative ones included)
back into the table. There is no interpolation: at 65 536 entries the
truncation error sits around -96 dB, below what 16-bit output can carry.

Two entry points:

  SineTable::at_phase(p)   p in cycles (1.0 = one full turn)
  fast_sin(x)              x in radians

`at_phase` is what the oscillators use. Phase 0.25 lands on index 16 384
exactly, so quarter-turn values come out of the table without rounding.

fastpow
-------
a^b split into integer and fractional exponent:

  a^b = a^floor(b) * a^frac(b)

The integer part is exponentiation by squaring. The fractional part uses the
IEEE-754 trick: the bit pattern of a double is roughly a scaled, biased log2
of its value, so interpolating bit patterns between 1.0 and `a` approximates
a^frac. It is coarse (a few percent) and only worth it when exponents are
large. `hybridpow` falls back to `powf` for |b| < 1 where the approximation
would dominate the result.
*/

pub const SINE_TABLE_LEN: usize = 1 << 16;
const SINE_MASK: i64 = SINE_TABLE_LEN as i64 - 1;
const RADIANS_TO_INDEX: f64 = SINE_TABLE_LEN as f64 / TAU;

/// Bit pattern used as the pivot for the fractional-exponent approximation.
const POW_BIAS: i64 = 4_606_921_280_493_453_312;

pub struct SineTable {
    values: Box<[f64]>,
}

impl SineTable {
    fn build() -> Self {
        let values = (0..SINE_TABLE_LEN)
            .map(|i| (TAU * i as f64 / SINE_TABLE_LEN as f64).sin())
            .collect();
        Self { values }
    }

    #[inline(always)]
    pub fn at_index(&self, index: i64) -> f64 {
        self.values[(index & SINE_MASK) as usize]
    }

    /// Sine of `phase` full cycles.
    #[inline(always)]
    pub fn at_phase(&self, phase: f64) -> f64 {
        self.at_index((phase * SINE_TABLE_LEN as f64) as i64)
    }

    #[inline(always)]
    pub fn at_radians(&self, radians: f64) -> f64 {
        self.at_index((radians * RADIANS_TO_INDEX) as i64)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub static SINE: Lazy<SineTable> = Lazy::new(SineTable::build);

#[inline(always)]
pub fn fast_sin(radians: f64) -> f64 {
    SINE.at_radians(radians)
}

#[inline(always)]
pub fn sin_cycles(phase: f64) -> f64 {
    SINE.at_phase(phase)
}

pub fn fastpow(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 1.0;
    }
    if b == 1.0 {
        return a;
    }
    if b < 0.0 {
        return 1.0 / fastpow(a, -b);
    }
    if b <= 10.0 && b == b.trunc() {
        let mut result = a;
        for _ in 1..(b as u32) {
            result *= a;
        }
        return result;
    }

    let mut result = 1.0;
    let mut base = a;
    let mut exp = b as i64;
    while exp != 0 {
        if exp & 1 != 0 {
            result *= base;
        }
        base *= base;
        exp >>= 1;
    }

    let fraction = b - b.trunc();
    if fraction == 0.0 {
        return result;
    }
    let bits = a.to_bits() as i64;
    let approx = (fraction * (bits - POW_BIAS) as f64) as i64 + POW_BIAS;
    result * f64::from_bits(approx as u64)
}

/// `powf` for small exponents, [`fastpow`] otherwise.
#[inline]
pub fn hybridpow(a: f64, b: f64) -> f64 {
    if b.abs() < 1.0 {
        a.powf(b)
    } else {
        fastpow(a, b)
    }
}
