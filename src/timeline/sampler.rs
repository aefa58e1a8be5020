use crate::config::TimingConfig;
use crate::foundation::core::{FrameIndex, FrameSet};
use crate::foundation::error::{ReelError, ReelResult};

/// Picks which series points become animation frames.
///
/// Frames are taken at a fractional stride of `n / target_frame_count` (or every point for short
/// series), so the frame count stays bounded by `target_frame_count + 1` regardless of how long
/// the series is. The final point is always included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSampler {
    target_frame_count: usize,
}

impl FrameSampler {
    pub fn new(target_frame_count: usize) -> ReelResult<Self> {
        if target_frame_count == 0 {
            return Err(ReelError::invalid_input("target frame count must be non-zero"));
        }
        Ok(Self { target_frame_count })
    }

    pub fn from_config(cfg: &TimingConfig) -> ReelResult<Self> {
        Self::new(cfg.target_frame_count)
    }

    pub fn target_frame_count(&self) -> usize {
        self.target_frame_count
    }

    pub fn sample(&self, n: usize) -> ReelResult<FrameSet> {
        if n == 0 {
            return Err(ReelError::invalid_input("cannot sample an empty series"));
        }

        let target = self.target_frame_count;
        let mut indices: Vec<FrameIndex> = if n <= target {
            (0..n).map(FrameIndex).collect()
        } else {
            // floor(i * n / target) is strictly increasing because n > target.
            (0..target)
                .map(|i| FrameIndex(((i as u128 * n as u128) / target as u128) as usize))
                .collect()
        };

        let last = FrameIndex(n - 1);
        if indices.last() != Some(&last) {
            indices.push(last);
        }

        tracing::debug!(series_len = n, frames = indices.len(), "sampled frames");
        FrameSet::new(indices, n)
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self {
            target_frame_count: TimingConfig::default().target_frame_count,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sampler.rs"]
mod tests;
