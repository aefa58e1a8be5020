//! seriesreel turns an ordered numeric series into a short narrated chart video.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: a [`SeriesSource`] yields a validated [`SeriesModel`]
//! 2. **Sample**: [`FrameSampler`] picks a bounded [`FrameSet`] that always ends on the last point
//! 3. **Schedule**: [`DurationScheduler`] assigns per-frame durations with a final hold
//! 4. **Sonify**: [`ToneSynthesizer`] maps each frame's value to a pitch, and
//!    [`AudioTrackAssembler`] joins the tones into one track of exactly the video's length
//! 5. **Render**: a [`FrameRenderer`] writes one image per frame
//! 6. **Encode**: [`ManifestBuilder`] pairs images with durations and an [`Encoder`] muxes the
//!    result with the audio track (the system `ffmpeg` binary by default)
//!
//! [`Pipeline`] drives one run through these stages and reports a [`RunOutcome`]; every
//! intermediate file lives in a scoped temporary directory.
#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod timeline;

pub use audio::tone::{ToneSegment, ToneSynthesizer, ms_to_samples};
pub use audio::track::{AudioTrack, AudioTrackAssembler};
pub use config::{
    AppConfig, EncoderConfig, OutputConfig, RenderConfig, SourceConfig, TimingConfig, ToneConfig,
};
pub use encode::ffmpeg::{
    FfmpegEncoder, FfmpegEncoderOpts, ensure_parent_dir, is_ffmpeg_available,
};
pub use encode::manifest::{
    Manifest, ManifestBuilder, ManifestEntry, escape_concat_path, format_secs,
};
pub use encode::sink::{AudioInputConfig, EncodeJob, Encoder};
pub use foundation::core::{
    DurationPlan, FrameIndex, FrameSet, SeriesModel, SeriesPoint, ValueRange,
};
pub use foundation::error::{ErrorKind, ReelError, ReelResult};
pub use pipeline::batch::{BatchReport, ProgressEvent, SeriesFailure};
pub use pipeline::{
    Pipeline, PipelineState, Planner, RunFailure, RunOutcome, RunStats, SeriesPlan,
};
pub use render::chart::{ChartRenderer, ChartStyle, PLOT_COLORS};
pub use render::{FrameRenderer, FrameRequest};
pub use source::cryptocompare::CryptoCompareSource;
pub use source::json::JsonFileSource;
pub use source::{SeriesRequest, SeriesSource};
pub use timeline::sampler::FrameSampler;
pub use timeline::schedule::DurationScheduler;
