use crate::config::TimingConfig;
use crate::foundation::core::DurationPlan;
use crate::foundation::error::{ReelError, ReelResult};

/// Assigns a play duration to every sampled frame.
///
/// All non-final frames share `base_budget / (frames - 1)` milliseconds, where the budget grows
/// by `growth_per_frame_ms` for each frame above `growth_threshold`. The final frame always gets
/// `hold_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationScheduler {
    timing: TimingConfig,
}

impl DurationScheduler {
    pub fn new(timing: TimingConfig) -> ReelResult<Self> {
        timing.validate()?;
        Ok(Self { timing })
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Total milliseconds shared by the non-final frames.
    pub fn base_budget_ms(&self, frame_count: usize) -> u64 {
        let extra_frames = frame_count.saturating_sub(self.timing.growth_threshold) as u64;
        self.timing.base_budget_ms + extra_frames * self.timing.growth_per_frame_ms
    }

    /// Duration of each non-final frame.
    pub fn frame_ms(&self, frame_count: usize) -> u64 {
        let divisor = frame_count.saturating_sub(1).max(1) as u64;
        (self.base_budget_ms(frame_count) / divisor).max(self.timing.floor_ms)
    }

    pub fn schedule(&self, frame_count: usize) -> ReelResult<DurationPlan> {
        if frame_count == 0 {
            return Err(ReelError::invalid_input("cannot schedule zero frames"));
        }

        let frame_ms = self.frame_ms(frame_count);
        let mut durations = vec![frame_ms; frame_count - 1];
        durations.push(self.timing.hold_ms);

        tracing::debug!(
            frames = frame_count,
            frame_ms,
            hold_ms = self.timing.hold_ms,
            "scheduled durations"
        );
        DurationPlan::new(durations, self.timing.floor_ms)
    }
}

impl Default for DurationScheduler {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/schedule.rs"]
mod tests;
