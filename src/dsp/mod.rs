//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here works one sample at a time on plain state, with no
//! allocation after construction. The graph layer decides where the inputs
//! come from; these types only do the math.

/// Band-limited impulse trains and the saw/pulse shapers built on them.
pub mod blit;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant biquad low-pass.
pub mod filter;
/// Sine table and fast power approximations.
pub mod math;
/// Phase-modulation operator.
pub mod operator;
/// Phase accumulator.
pub mod oscillator;

pub use envelope::{AdsrParams, EnvelopeStage};
