use crate::audio::tone::ToneSynthesizer;
use crate::config::AppConfig;
use crate::foundation::core::{DurationPlan, FrameSet, SeriesModel};
use crate::foundation::error::ReelResult;
use crate::timeline::sampler::FrameSampler;
use crate::timeline::schedule::DurationScheduler;

/// Frame selection, timing and pitch for a series, without rendering anything.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SeriesPlan {
    pub frames: FrameSet,
    pub durations: DurationPlan,
    /// Tone pitch per frame, in frame order.
    pub frequencies_hz: Vec<f64>,
    pub total_ms: u64,
}

/// The pure stages of a run: sampling, scheduling and pitch mapping.
#[derive(Clone, Debug)]
pub struct Planner {
    pub(crate) sampler: FrameSampler,
    pub(crate) scheduler: DurationScheduler,
    pub(crate) synth: ToneSynthesizer,
}

impl Planner {
    pub fn new(config: &AppConfig) -> ReelResult<Self> {
        Ok(Self {
            sampler: FrameSampler::from_config(&config.timing)?,
            scheduler: DurationScheduler::new(config.timing.clone())?,
            synth: ToneSynthesizer::new(&config.tone)?,
        })
    }

    pub fn plan(&self, series: &SeriesModel) -> ReelResult<SeriesPlan> {
        let frames = self.sampler.sample(series.len())?;
        let durations = self.scheduler.schedule(frames.len())?;
        let range = series.value_range();
        let frequencies_hz = frames
            .iter()
            .filter_map(|idx| series.point(idx))
            .map(|p| self.synth.frequency_for(p.value, range))
            .collect();
        Ok(SeriesPlan {
            total_ms: durations.total_ms(),
            frames,
            durations,
            frequencies_hz,
        })
    }
}
