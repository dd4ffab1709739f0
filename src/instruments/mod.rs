//! Complete instruments built from graph nodes.

pub mod organ;
pub mod patches;
pub mod presets;

pub use organ::DrawbarOrgan;
pub use patches::{organ, phase_mod, subtractive, Patch};
pub use presets::{Preset, PresetTable};
