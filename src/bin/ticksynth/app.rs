//! Ticksynth - wires MIDI input, a patch and the audio device together

use std::{
    path::PathBuf,
    sync::atomic::Ordering,
    thread,
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use midir::{Ignore, MidiInput, MidiInputConnection};
use rtrb::Producer;
use tracing::{info, warn};

use ticksynth::{
    instruments::{organ, phase_mod, subtractive},
    io::{midi::midi_queue, CpalSink, MidiEvent},
    Graph, RenderLoop, SynthConfig,
};

use super::PatchKind;

const APP_NAME: &str = "ticksynth";

pub struct Ticksynth {
    patch: PatchKind,
    config_file: Option<PathBuf>,
    seconds: Option<f64>,
}

impl Ticksynth {
    pub fn new(patch: PatchKind) -> Self {
        Self {
            patch,
            config_file: None,
            seconds: None,
        }
    }

    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn seconds(mut self, seconds: Option<f64>) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn run(self) -> EyreResult<()> {
        let config = match &self.config_file {
            Some(path) => SynthConfig::load(path).wrap_err("failed to load config")?,
            None => SynthConfig::default(),
        };
        config.validate()?;

        let (keys, events) = midi_queue();
        // keep the connection open for as long as we render
        let _connection = connect_first_port(keys)?;

        let graph: Graph = match self.patch {
            PatchKind::Organ => organ(config, events)?.graph,
            PatchKind::Subtractive => subtractive(config, events)?.graph,
            PatchKind::PhaseMod => phase_mod(config, events)?.graph,
        };

        let sink = CpalSink::open(&config).wrap_err("failed to open audio output")?;
        if f64::from(sink.sample_rate()) != config.sample_rate {
            return Err(eyre!(
                "device runs at {} Hz, config asks for {} Hz",
                sink.sample_rate(),
                config.sample_rate
            ));
        }

        let mut render = RenderLoop::new(graph, sink, config);
        if let Some(seconds) = self.seconds {
            let stop = render.stop_handle();
            thread::spawn(move || {
                thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
                stop.store(true, Ordering::Relaxed);
            });
        }

        info!(patch = ?self.patch, "playing, press Ctrl+C to stop");
        render.run()?;
        Ok(())
    }
}

/// Open the first MIDI input port, if there is one.
fn connect_first_port(mut keys: Producer<MidiEvent>) -> EyreResult<Option<MidiInputConnection<()>>> {
    let mut input = MidiInput::new(APP_NAME).wrap_err("failed to initialise MIDI")?;
    input.ignore(Ignore::All);

    let ports = input.ports();
    let Some(port) = ports.first() else {
        warn!("no MIDI input ports found, the patch will stay silent");
        return Ok(None);
    };
    let name = input.port_name(port).unwrap_or_else(|_| String::from("unknown"));
    info!(port = %name, "connecting MIDI input");

    let connection = input
        .connect(
            port,
            &format!("{APP_NAME}-in"),
            move |_stamp, message, _| {
                if let Some(event) = MidiEvent::from_bytes(message) {
                    if keys.push(event).is_err() {
                        warn!(?event, "MIDI queue full, event dropped");
                    }
                }
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to MIDI port {name}: {err}"))?;
    Ok(Some(connection))
}
