use crate::config::ToneConfig;
use crate::foundation::core::ValueRange;
use crate::foundation::error::{ReelError, ReelResult};

/// One rendered mono tone.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneSegment {
    pub frequency_hz: f64,
    /// Requested duration; `samples.len()` is this duration rounded to the sample grid.
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl ToneSegment {
    pub fn rendered_duration_ms(&self) -> f64 {
        (self.samples.len() as f64) * 1000.0 / f64::from(self.sample_rate)
    }
}

/// Maps a series value to a pitch and renders a faded sine of that pitch.
#[derive(Clone, Debug)]
pub struct ToneSynthesizer {
    min_freq_hz: f64,
    max_freq_hz: f64,
    amplitude: f32,
    fade_ms: u64,
    sample_rate: u32,
    flat_epsilon: f64,
}

impl ToneSynthesizer {
    pub fn new(cfg: &ToneConfig) -> ReelResult<Self> {
        cfg.validate()?;
        Ok(Self {
            min_freq_hz: cfg.min_freq_hz,
            max_freq_hz: cfg.max_freq_hz,
            amplitude: db_to_gain(cfg.volume_db),
            fade_ms: cfg.fade_ms,
            sample_rate: cfg.sample_rate,
            flat_epsilon: cfg.flat_epsilon,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Position of `value` inside `range`, clamped to `[0, 1]`.
    ///
    /// Degenerate ranges (every value equal) map to the midpoint.
    pub fn normalize(&self, value: f64, range: ValueRange) -> f64 {
        let span = range.span();
        if span <= self.flat_epsilon {
            return 0.5;
        }
        ((value - range.min) / span).clamp(0.0, 1.0)
    }

    pub fn frequency_for(&self, value: f64, range: ValueRange) -> f64 {
        let norm = self.normalize(value, range);
        self.min_freq_hz + norm * (self.max_freq_hz - self.min_freq_hz)
    }

    /// Render a standalone segment of `duration_ms`.
    pub fn render(
        &self,
        value: f64,
        range: ValueRange,
        duration_ms: u64,
    ) -> ReelResult<ToneSegment> {
        self.render_span(value, range, 0, duration_ms)
    }

    /// Render the segment occupying `[start_ms, start_ms + duration_ms)` of a longer track.
    ///
    /// The sample count is taken from the rounded cumulative boundaries, so consecutive spans
    /// concatenate to exactly `ms_to_samples(total_ms)` samples.
    pub fn render_span(
        &self,
        value: f64,
        range: ValueRange,
        start_ms: u64,
        duration_ms: u64,
    ) -> ReelResult<ToneSegment> {
        if duration_ms == 0 {
            return Err(ReelError::invalid_input("tone duration must be positive"));
        }
        if !value.is_finite() {
            return Err(ReelError::invalid_input("tone value must be finite"));
        }

        let start = ms_to_samples(start_ms, self.sample_rate);
        let end = ms_to_samples(start_ms + duration_ms, self.sample_rate);
        let len = usize::try_from(end - start)
            .map_err(|_| ReelError::invalid_input("tone segment is too long"))?;

        let frequency_hz = self.frequency_for(value, range);
        let fade_len = (ms_to_samples(self.fade_ms, self.sample_rate) as usize).min(len / 2);
        let step = std::f64::consts::TAU * frequency_hz / f64::from(self.sample_rate);

        let samples = (0..len)
            .map(|i| {
                let gain = fade_gain(i, len, fade_len) * self.amplitude;
                ((step * i as f64).sin() as f32) * gain
            })
            .collect();

        Ok(ToneSegment {
            frequency_hz,
            duration_ms,
            sample_rate: self.sample_rate,
            samples,
        })
    }
}

/// Nearest sample index for a millisecond offset.
pub fn ms_to_samples(ms: u64, sample_rate: u32) -> u64 {
    let num = u128::from(ms) * u128::from(sample_rate);
    ((num + 500) / 1000) as u64
}

fn db_to_gain(db: f64) -> f32 {
    10f64.powf(db / 20.0) as f32
}

fn fade_gain(i: usize, len: usize, fade_len: usize) -> f32 {
    if fade_len == 0 {
        return 1.0;
    }
    let fade_in = (i as f32 / fade_len as f32).min(1.0);
    let fade_out = ((len - 1 - i) as f32 / fade_len as f32).min(1.0);
    fade_in.min(fade_out)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tone.rs"]
mod tests;
