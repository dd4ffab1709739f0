use tracing::debug;

use crate::{
    config::SynthConfig,
    dsp::{math::sin_cycles, oscillator::Phasor},
    graph::node::{NodeId, SignalNode, Signals},
    instruments::presets::PresetTable,
};

/*
Drawbar Organ
=============

Nine sine partials over one fundamental, each with its own drawbar:

  drawbar   16'   5⅓'   8'   4'   2⅔'   2'   1⅗'   1⅓'   1'
  ratio     0.5   1.5   1    2    3     4    5     6     8

  out = 0.5 + Σ level_i · sin(2π·φ_i) / 144

Levels run 0..=8. The divisor is 2 · 9 partials · 8, so nine partials at
full level swing exactly between 0 and 1.

Levels come from two places. A preset selector writes all nine at once, but
only on the tick its value moves away from the last one seen. That starts at
preset 0, so a selector parked anywhere else takes effect on the first tick.
A drawbar input writes its own level on the tick its value moves, which
includes the first tick. Whichever moved last wins. NaN inputs are ignored.
*/

pub const DRAWBAR_RATIOS: [f64; 9] = [0.5, 1.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0];
pub const DEFAULT_DRAWBAR_LEVEL: f64 = 6.0;
pub const MAX_DRAWBAR_LEVEL: f64 = 8.0;
const NORMALIZE: f64 = 2.0 * 9.0 * MAX_DRAWBAR_LEVEL;

pub struct DrawbarOrgan {
    config: SynthConfig,
    frequency: NodeId,
    partials: [Phasor; 9],
    levels: [f64; 9],
    drawbars: [Option<NodeId>; 9],
    last_drawbars: [f64; 9],
    preset: Option<NodeId>,
    last_preset: f64,
    table: PresetTable,
}

impl DrawbarOrgan {
    pub fn new(config: SynthConfig, frequency: NodeId) -> Self {
        Self {
            config,
            frequency,
            partials: std::array::from_fn(|_| Phasor::new(config)),
            levels: [DEFAULT_DRAWBAR_LEVEL; 9],
            drawbars: [None; 9],
            last_drawbars: [f64::NAN; 9],
            preset: None,
            last_preset: 0.0,
            table: PresetTable::factory(),
        }
    }

    /// Wire drawbar `n` (0 = 16' through 8 = 1'). Out-of-range `n` is ignored.
    pub fn drawbar(mut self, n: usize, level: NodeId) -> Self {
        if let Some(slot) = self.drawbars.get_mut(n) {
            *slot = Some(level);
        }
        self
    }

    pub fn with_preset(mut self, selector: NodeId) -> Self {
        self.preset = Some(selector);
        self
    }

    pub fn levels(&self) -> [f64; 9] {
        self.levels
    }

    fn follow_preset(&mut self, signals: &Signals<'_>) {
        let Some(selector) = self.preset else {
            return;
        };
        let value = signals.get(selector);
        if !moved(self.last_preset, value) {
            return;
        }
        self.last_preset = value;
        if let Some(preset) = self.table.select(value) {
            debug!(preset = preset.name, "drawbar preset");
            self.levels = preset.levels();
        }
    }

    fn follow_drawbars(&mut self, signals: &Signals<'_>) {
        for ((wire, last), level) in self
            .drawbars
            .iter()
            .zip(self.last_drawbars.iter_mut())
            .zip(self.levels.iter_mut())
        {
            let Some(id) = *wire else {
                continue;
            };
            let value = signals.get(id);
            if moved(*last, value) {
                *last = value;
                *level = value;
            }
        }
    }
}

#[inline]
fn moved(last: f64, value: f64) -> bool {
    !value.is_nan() && value.to_bits() != last.to_bits()
}

impl SignalNode for DrawbarOrgan {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        self.follow_preset(signals);
        self.follow_drawbars(signals);

        let hz = self.config.value_to_hz(signals.get(self.frequency));
        let sum: f64 = self
            .partials
            .iter_mut()
            .zip(DRAWBAR_RATIOS)
            .zip(self.levels)
            .map(|((partial, ratio), level)| {
                let phase = partial.advance(hz * ratio);
                level.clamp(0.0, MAX_DRAWBAR_LEVEL) * sin_cycles(phase)
            })
            .sum();
        0.5 + sum / NORMALIZE
    }

    fn inputs(&self) -> Vec<NodeId> {
        std::iter::once(Some(self.frequency))
            .chain(std::iter::once(self.preset))
            .chain(self.drawbars.iter().copied())
            .flatten()
            .collect()
    }

    fn name(&self) -> &'static str {
        "drawbar_organ"
    }
}
