use std::path::Path;

use anyhow::Context as _;

use crate::audio::tone::ToneSegment;
use crate::foundation::error::{ReelError, ReelResult};

/// Continuous mono PCM built from consecutive tone segments.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
    pub segment_count: usize,
}

impl AudioTrack {
    pub fn duration_ms(&self) -> f64 {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        (frames as f64) * 1000.0 / f64::from(self.sample_rate)
    }

    /// Write interleaved samples as raw little-endian `f32` PCM.
    pub fn write_f32le(&self, out_path: &Path) -> ReelResult<()> {
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("create audio output directory '{}'", parent.display())
            })?;
        }

        let mut bytes = Vec::<u8>::with_capacity(self.samples.len() * 4);
        for &sample in &self.samples {
            bytes.extend_from_slice(&sample.clamp(-1.0, 1.0).to_le_bytes());
        }
        std::fs::write(out_path, bytes)
            .with_context(|| format!("write audio track '{}'", out_path.display()))?;
        Ok(())
    }
}

/// Joins tone segments end to end.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioTrackAssembler;

impl AudioTrackAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate `segments` in order.
    ///
    /// Returns `Ok(None)` when there is nothing to play, so the caller can mux without an audio
    /// stream instead of handing the encoder an empty one.
    pub fn assemble(&self, segments: Vec<ToneSegment>) -> ReelResult<Option<AudioTrack>> {
        let Some(first) = segments.first() else {
            return Ok(None);
        };
        let sample_rate = first.sample_rate;
        if let Some(bad) = segments.iter().find(|s| s.sample_rate != sample_rate) {
            return Err(ReelError::invalid_input(format!(
                "tone segments mix sample rates {sample_rate} Hz and {} Hz",
                bad.sample_rate
            )));
        }

        let total: usize = segments.iter().map(|s| s.samples.len()).sum();
        if total == 0 {
            return Ok(None);
        }

        let segment_count = segments.len();
        let mut samples = Vec::with_capacity(total);
        for seg in segments {
            samples.extend(seg.samples);
        }

        Ok(Some(AudioTrack {
            sample_rate,
            channels: 1,
            samples,
            segment_count,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
