use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SampleFormat, SizedSample,
};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, error, info, warn};

use crate::{config::SynthConfig, error::SinkError};

/// Destination for rendered PCM: mono, signed 16-bit little-endian.
///
/// `write` may block; that is how a device paces the render loop.
pub trait AudioSink {
    fn write(&mut self, pcm: &[u8]) -> Result<(), SinkError>;

    /// Wait until everything written so far has been played.
    fn drain(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every byte it is given.
#[derive(Debug, Default)]
pub struct MemorySink {
    bytes: Vec<u8>,
    writes: usize,
    drained: bool,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded samples.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    /// Number of `write` calls seen.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AudioSink for MemorySink {
    fn write(&mut self, pcm: &[u8]) -> Result<(), SinkError> {
        self.bytes.extend_from_slice(pcm);
        self.writes += 1;
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        self.drained = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}

const BACKOFF: Duration = Duration::from_millis(1);

/// Default output device through cpal.
///
/// Samples cross to the device callback through a bounded queue. When the
/// queue is full `write` sleeps until the callback has made room, so the
/// render loop runs at the device's pace. A device with more than one
/// channel gets the same sample on every channel.
pub struct CpalSink {
    queue: Producer<i16>,
    stream: cpal::Stream,
    alive: Arc<AtomicBool>,
    underruns: Arc<AtomicU64>,
    sample_rate: u32,
    channels: u16,
}

impl CpalSink {
    pub fn open(config: &SynthConfig) -> Result<Self, SinkError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;
        let sample_rate = config.sample_rate.round() as u32;

        let range = device
            .supported_output_configs()?
            .filter(|range| range.min_sample_rate().0 <= sample_rate && sample_rate <= range.max_sample_rate().0)
            .min_by_key(|range| (range.channels(), format_preference(range.sample_format())))
            .ok_or(SinkError::UnsupportedConfig { sample_rate })?;
        let supported = range.with_sample_rate(cpal::SampleRate(sample_rate));
        let format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        let (queue, consumer) = RingBuffer::<i16>::new(config.ring_capacity.max(1));
        let alive = Arc::new(AtomicBool::new(true));
        let underruns = Arc::new(AtomicU64::new(0));
        let shared = Shared {
            queue: consumer,
            alive: Arc::clone(&alive),
            underruns: Arc::clone(&underruns),
        };

        let stream = match format {
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, shared)?,
            SampleFormat::I32 => build_stream::<i32>(&device, &stream_config, shared)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, shared)?,
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, shared)?,
            SampleFormat::F64 => build_stream::<f64>(&device, &stream_config, shared)?,
            other => return Err(SinkError::SampleFormat(other)),
        };
        stream.play()?;

        info!(
            sample_rate,
            channels = stream_config.channels,
            format = %format,
            capacity = config.ring_capacity,
            "audio output opened"
        );

        Ok(Self {
            queue,
            stream,
            alive,
            underruns,
            sample_rate,
            channels: stream_config.channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Callbacks that found the queue empty.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    fn check_alive(&self) -> Result<(), SinkError> {
        if self.alive.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(SinkError::Disconnected)
        }
    }
}

impl AudioSink for CpalSink {
    fn write(&mut self, pcm: &[u8]) -> Result<(), SinkError> {
        for pair in pcm.chunks_exact(2) {
            let sample = i16::from_le_bytes([pair[0], pair[1]]);
            while self.queue.push(sample).is_err() {
                self.check_alive()?;
                thread::sleep(BACKOFF);
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        let capacity = self.queue.buffer().capacity();
        let queued = capacity - self.queue.slots();
        let budget = Duration::from_secs_f64(queued as f64 / f64::from(self.sample_rate.max(1))) * 2 + BACKOFF * 100;
        let deadline = Instant::now() + budget;

        while self.queue.slots() < capacity {
            self.check_alive()?;
            if Instant::now() >= deadline {
                warn!(left = capacity - self.queue.slots(), "gave up draining audio queue");
                break;
            }
            thread::sleep(BACKOFF);
        }
        debug!(underruns = self.underruns(), "audio queue drained");
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.stream.pause()?;
        info!(underruns = self.underruns(), "audio output closed");
        Ok(())
    }
}

/// State moved into the device callback.
struct Shared {
    queue: Consumer<i16>,
    alive: Arc<AtomicBool>,
    underruns: Arc<AtomicU64>,
}

fn build_stream<T>(device: &cpal::Device, config: &cpal::StreamConfig, shared: Shared) -> Result<cpal::Stream, SinkError>
where
    T: SizedSample + FromSample<i16>,
{
    let Shared {
        mut queue,
        alive,
        underruns,
    } = shared;
    let channels = usize::from(config.channels.max(1));

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut starved = false;
            for frame in data.chunks_mut(channels) {
                let sample = match queue.pop() {
                    Ok(sample) => sample,
                    Err(_) => {
                        starved = true;
                        0
                    }
                };
                frame.fill(T::from_sample(sample));
            }
            if starved {
                underruns.fetch_add(1, Ordering::Relaxed);
            }
        },
        move |err| {
            error!(%err, "audio stream error");
            alive.store(false, Ordering::Relaxed);
        },
        None,
    )?;
    Ok(stream)
}

/// Lower is better. Native 16-bit first, then float.
fn format_preference(format: SampleFormat) -> u8 {
    match format {
        SampleFormat::I16 => 0,
        SampleFormat::F32 => 1,
        SampleFormat::I32 => 2,
        SampleFormat::F64 => 3,
        SampleFormat::U16 => 4,
        _ => u8::MAX,
    }
}
