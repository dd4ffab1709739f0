//! Whole-patch benchmarks.
//!
//! These render the ready-made instruments through the render loop into a
//! memory sink, the same path the binary takes minus the device.

mod patches;

pub use patches::bench_patches;
