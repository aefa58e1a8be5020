use std::path::PathBuf;

use crate::foundation::error::ReelResult;

/// Raw PCM audio input for encoders that mux an audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Everything the encoder needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Concat script listing every frame asset with its duration.
    pub manifest_path: PathBuf,
    /// `None` produces a video without an audio stream.
    pub audio: Option<AudioInputConfig>,
    pub out_path: PathBuf,
}

/// Muxes frames and audio into the final container.
///
/// Implementations block until the output is complete and must bound their own runtime.
pub trait Encoder {
    fn encode(&self, job: &EncodeJob) -> ReelResult<()>;
}
