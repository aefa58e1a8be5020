//! Run orchestration: series in, MP4 out.
//!
//! A run moves strictly forward through [`PipelineState`]. Every intermediate file lives in one
//! scoped temporary directory that is removed on every exit path; only the finished video is moved
//! into the configured output directory.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::audio::track::AudioTrackAssembler;
use crate::config::AppConfig;
use crate::encode::manifest::ManifestBuilder;
use crate::encode::sink::{AudioInputConfig, EncodeJob, Encoder};
use crate::foundation::core::SeriesModel;
use crate::foundation::error::{ErrorKind, ReelError, ReelResult};
use crate::render::{FrameRenderer, FrameRequest};
use crate::source::{SeriesRequest, SeriesSource};

/// Sequential batch runs with progress reporting.
pub mod batch;
mod plan;

pub use plan::{Planner, SeriesPlan};

const MANIFEST_FILE: &str = "concat_list.txt";
const AUDIO_FILE: &str = "audio.f32le";
const ENCODED_FILE: &str = "out.mp4";

/// Lifecycle of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PipelineState {
    Idle,
    Sampled,
    Scheduled,
    Synthesizing,
    ManifestReady,
    Encoding,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::Idle => "idle",
            PipelineState::Sampled => "sampled",
            PipelineState::Scheduled => "scheduled",
            PipelineState::Synthesizing => "synthesizing",
            PipelineState::ManifestReady => "manifest-ready",
            PipelineState::Encoding => "encoding",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    pub frame_count: usize,
    pub total_ms: u64,
    pub audio_samples: usize,
    pub audio_muxed: bool,
}

/// Why a run stopped, and where.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RunFailure {
    pub kind: ErrorKind,
    /// Last state reached before the failure.
    pub stage: PipelineState,
    pub message: String,
}

impl RunFailure {
    fn from_error(err: &ReelError, stage: PipelineState) -> Self {
        Self {
            kind: err.kind(),
            stage,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} during {}: {}", self.kind, self.stage, self.message)
    }
}

/// Result of a single run. Errors are classified, never returned raw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Done { artifact: PathBuf, stats: RunStats },
    Failed(RunFailure),
}

impl RunOutcome {
    pub fn final_state(&self) -> PipelineState {
        match self {
            RunOutcome::Done { .. } => PipelineState::Done,
            RunOutcome::Failed(_) => PipelineState::Failed,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RunOutcome::Done { .. })
    }

    pub fn artifact(&self) -> Option<&Path> {
        match self {
            RunOutcome::Done { artifact, .. } => Some(artifact),
            RunOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&RunFailure> {
        match self {
            RunOutcome::Done { .. } => None,
            RunOutcome::Failed(f) => Some(f),
        }
    }
}

pub struct Pipeline {
    config: AppConfig,
    source: Box<dyn SeriesSource>,
    renderer: Box<dyn FrameRenderer>,
    encoder: Box<dyn Encoder>,
    planner: Planner,
    assembler: AudioTrackAssembler,
    manifests: ManifestBuilder,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        source: Box<dyn SeriesSource>,
        renderer: Box<dyn FrameRenderer>,
        encoder: Box<dyn Encoder>,
    ) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            planner: Planner::new(&config)?,
            assembler: AudioTrackAssembler::new(),
            manifests: ManifestBuilder::new(),
            config,
            source,
            renderer,
            encoder,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn plan_series(&self, series: &SeriesModel) -> ReelResult<SeriesPlan> {
        self.planner.plan(series)
    }

    /// Fetch the requested series, then run it.
    #[tracing::instrument(skip(self, request), fields(symbol = %request.symbol, days = request.lookback_days))]
    pub fn run(&self, request: &SeriesRequest) -> RunOutcome {
        match self.source.fetch(request) {
            Ok(series) => self.run_series(&request.symbol, &series),
            Err(err) => {
                let err = match err {
                    ReelError::DataUnavailable(_) => err,
                    other => ReelError::data_unavailable(other.to_string()),
                };
                tracing::error!(error = %err, "fetch failed");
                RunOutcome::Failed(RunFailure::from_error(&err, PipelineState::Idle))
            }
        }
    }

    /// Render, sonify and encode an already fetched series.
    #[tracing::instrument(skip(self, series), fields(points = series.len()))]
    pub fn run_series(&self, symbol: &str, series: &SeriesModel) -> RunOutcome {
        let mut state = PipelineState::Idle;
        match self.execute(symbol, series, &mut state) {
            Ok((artifact, stats)) => {
                advance(&mut state, PipelineState::Done);
                tracing::info!(
                    artifact = %artifact.display(),
                    frames = stats.frame_count,
                    total_ms = stats.total_ms,
                    "run complete"
                );
                RunOutcome::Done { artifact, stats }
            }
            Err(err) => {
                tracing::error!(stage = %state, error = %err, "run failed");
                RunOutcome::Failed(RunFailure::from_error(&err, state))
            }
        }
    }

    fn execute(
        &self,
        symbol: &str,
        series: &SeriesModel,
        state: &mut PipelineState,
    ) -> ReelResult<(PathBuf, RunStats)> {
        if symbol.trim().is_empty() {
            return Err(ReelError::invalid_input("symbol must be non-empty"));
        }

        let frames = self.planner.sampler.sample(series.len())?;
        advance(state, PipelineState::Sampled);

        let durations = self.planner.scheduler.schedule(frames.len())?;
        advance(state, PipelineState::Scheduled);

        // Dropped on every return below, taking all intermediate files with it.
        let scratch = tempfile::Builder::new()
            .prefix(&format!("seriesreel_{}_", file_stem(symbol)))
            .tempdir()
            .context("create scratch directory")?;

        advance(state, PipelineState::Synthesizing);
        let range = series.value_range();
        let mut segments = Vec::with_capacity(frames.len());
        let mut start_ms = 0u64;
        for (idx, &duration_ms) in frames.iter().zip(durations.as_slice()) {
            let value = point_value(series, idx.0)?;
            segments.push(self.planner.synth.render_span(value, range, start_ms, duration_ms)?);
            start_ms += duration_ms;
        }
        let track = self.assembler.assemble(segments)?;

        let mut assets = Vec::with_capacity(frames.len());
        for (ordinal, index) in frames.iter().enumerate() {
            let path = scratch
                .path()
                .join(format!("frame_{ordinal:04}.{}", self.renderer.extension()));
            let req = FrameRequest {
                symbol,
                series,
                index,
                ordinal,
            };
            self.renderer.render_frame(&req, &path)?;
            tracing::debug!(frame = ordinal, index = index.0, "frame ready");
            assets.push(path);
        }

        let audio = match track.as_ref() {
            Some(track) => {
                let path = scratch.path().join(AUDIO_FILE);
                track.write_f32le(&path)?;
                Some(AudioInputConfig {
                    path,
                    sample_rate: track.sample_rate,
                    channels: track.channels,
                })
            }
            None => {
                tracing::warn!("no audio rendered; encoding without an audio stream");
                None
            }
        };

        let manifest = self.manifests.build(assets, &durations)?;
        let manifest_path = scratch.path().join(MANIFEST_FILE);
        manifest.write_to(&manifest_path)?;
        advance(state, PipelineState::ManifestReady);

        let job = EncodeJob {
            manifest_path,
            audio,
            out_path: scratch.path().join(ENCODED_FILE),
        };
        advance(state, PipelineState::Encoding);
        self.encoder.encode(&job)?;
        if !job.out_path.is_file() {
            return Err(ReelError::encoding_failed(
                "no output",
                format!("encoder exited cleanly but wrote no '{}'", job.out_path.display()),
            ));
        }

        let artifact = self.publish(symbol, &job.out_path)?;
        let stats = RunStats {
            frame_count: frames.len(),
            total_ms: durations.total_ms(),
            audio_samples: track.as_ref().map_or(0, |t| t.samples.len()),
            audio_muxed: track.is_some(),
        };
        Ok((artifact, stats))
    }

    /// Move the encoded file out of the scratch directory under a name no other run can claim.
    ///
    /// The destination is reserved as a temporary file in the output directory and only kept once
    /// it holds the complete video, so a failed copy leaves nothing behind.
    fn publish(&self, symbol: &str, encoded: &Path) -> ReelResult<PathBuf> {
        let dir = &self.config.output.dir;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?;
        let stamp = chrono::Utc::now().timestamp();
        let reserved = tempfile::Builder::new()
            .prefix(&format!("{}_{stamp}_", file_stem(symbol)))
            .suffix(".mp4")
            .tempfile_in(dir)
            .with_context(|| format!("reserve output file in '{}'", dir.display()))?;

        if std::fs::rename(encoded, reserved.path()).is_err() {
            // Scratch space may be on another filesystem.
            let mut src = std::fs::File::open(encoded)
                .with_context(|| format!("open encoded video '{}'", encoded.display()))?;
            let mut dst = reserved.as_file();
            std::io::copy(&mut src, &mut dst).with_context(|| {
                format!("copy '{}' to '{}'", encoded.display(), reserved.path().display())
            })?;
            if let Ok(meta) = src.metadata() {
                // Reserved files are created owner-only; match the encoder's output instead.
                let _ = std::fs::set_permissions(reserved.path(), meta.permissions());
            }
        }

        let (_, dest) = reserved
            .keep()
            .map_err(|e| anyhow::anyhow!("keep output file: {e}"))?;
        Ok(dest)
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    tracing::info!(from = %state, to = %next, "pipeline state");
    *state = next;
}

fn point_value(series: &SeriesModel, index: usize) -> ReelResult<f64> {
    series
        .points()
        .get(index)
        .map(|p| p.value)
        .ok_or_else(|| ReelError::invalid_input(format!("frame index {index} out of range")))
}

/// Symbol reduced to characters that are safe in a file name.
fn file_stem(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/mod.rs"]
mod tests;
