use crate::{
    config::SynthConfig,
    dsp::envelope::{AdsrParams, EnvelopeStage, Envelope},
    graph::node::{wired, NodeId, SignalNode, Signals},
};

/// ADSR envelope driven by a gate node.
///
/// Attack, decay and release inputs are in seconds, sustain is a level. Any
/// input left unwired falls back to the value given at construction. The
/// optional multiplier scales the output (a volume knob, or an option index
/// turned into a modulation depth).
pub struct AdsrNode {
    env: Envelope,
    gate: NodeId,
    defaults: AdsrParams,
    attack: Option<NodeId>,
    decay: Option<NodeId>,
    sustain: Option<NodeId>,
    release: Option<NodeId>,
    multiplier: Option<NodeId>,
}

impl AdsrNode {
    pub fn new(config: SynthConfig, gate: NodeId) -> Self {
        Self::with_params(config, gate, AdsrParams::default())
    }

    pub fn with_params(config: SynthConfig, gate: NodeId, defaults: AdsrParams) -> Self {
        Self {
            env: Envelope::new(config),
            gate,
            defaults,
            attack: None,
            decay: None,
            sustain: None,
            release: None,
            multiplier: None,
        }
    }

    pub fn attack(mut self, id: NodeId) -> Self {
        self.attack = Some(id);
        self
    }

    pub fn decay(mut self, id: NodeId) -> Self {
        self.decay = Some(id);
        self
    }

    pub fn sustain(mut self, id: NodeId) -> Self {
        self.sustain = Some(id);
        self
    }

    pub fn release(mut self, id: NodeId) -> Self {
        self.release = Some(id);
        self
    }

    pub fn multiplier(mut self, id: NodeId) -> Self {
        self.multiplier = Some(id);
        self
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.env.stage()
    }
}

impl SignalNode for AdsrNode {
    fn update(&mut self, _tick: u64, signals: &Signals<'_>) -> f64 {
        let params = AdsrParams {
            attack: signals.get_or(self.attack, self.defaults.attack),
            decay: signals.get_or(self.decay, self.defaults.decay),
            sustain: signals.get_or(self.sustain, self.defaults.sustain),
            release: signals.get_or(self.release, self.defaults.release),
        };
        let level = self.env.next(params, signals.get(self.gate));
        level * signals.get_or(self.multiplier, 1.0)
    }

    fn inputs(&self) -> Vec<NodeId> {
        wired([
            Some(self.gate),
            self.attack,
            self.decay,
            self.sustain,
            self.release,
            self.multiplier,
        ])
    }

    fn name(&self) -> &'static str {
        "adsr"
    }
}
