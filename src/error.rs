use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {node} reads from {input}, which was never added")]
    UnknownInput { node: NodeId, input: NodeId },
    #[error("output node {0} was never added")]
    UnknownOutput(NodeId),
    #[error("node {0} was reserved but never filled")]
    Unfilled(NodeId),
    #[error("no output node was set")]
    MissingOutput,
    #[error("graph contains a cycle through node {0}")]
    Cycle(NodeId),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("output device does not support {sample_rate} Hz")]
    UnsupportedConfig { sample_rate: u32 },
    #[error("failed to query output configurations: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("failed to pause output stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),
    #[error("unsupported sample format {0}")]
    SampleFormat(cpal::SampleFormat),
    #[error("audio device went away")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "serde")]
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
