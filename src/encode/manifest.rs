use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::foundation::core::DurationPlan;
use crate::foundation::error::{ReelError, ReelResult};

/// One frame asset and how long it stays on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub asset: PathBuf,
    pub duration_ms: u64,
}

impl ManifestEntry {
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Ordered edit list handed to the encoder.
///
/// This list is the only timing source the encoder sees for the video stream, so entry order and
/// durations must match the audio track exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_ms(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_ms).sum()
    }

    /// Render the ffmpeg concat-demuxer script.
    ///
    /// The last asset is listed once more without a duration: the concat demuxer ignores the
    /// duration of the final entry otherwise, which would drop the hold.
    pub fn to_concat_script(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "file '{}'", escape_concat_path(&entry.asset));
            let _ = writeln!(out, "duration {}", format_secs(entry.duration_ms));
        }
        if let Some(last) = self.entries.last() {
            let _ = writeln!(out, "file '{}'", escape_concat_path(&last.asset));
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> ReelResult<()> {
        use anyhow::Context as _;
        std::fs::write(path, self.to_concat_script())
            .with_context(|| format!("write concat manifest '{}'", path.display()))?;
        Ok(())
    }
}

/// Pairs rendered frame assets with their scheduled durations.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManifestBuilder;

impl ManifestBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        frame_assets: Vec<PathBuf>,
        durations: &DurationPlan,
    ) -> ReelResult<Manifest> {
        if frame_assets.len() != durations.len() {
            return Err(ReelError::invalid_input(format!(
                "manifest needs one duration per frame: {} frames, {} durations",
                frame_assets.len(),
                durations.len()
            )));
        }
        if frame_assets.is_empty() {
            return Err(ReelError::invalid_input("manifest must contain at least one frame"));
        }

        let entries = frame_assets
            .into_iter()
            .zip(durations.as_slice().iter().copied())
            .map(|(asset, duration_ms)| ManifestEntry { asset, duration_ms })
            .collect();
        Ok(Manifest { entries })
    }
}

/// Seconds with exactly six decimals, computed without floating point.
pub fn format_secs(duration_ms: u64) -> String {
    format!("{}.{:03}000", duration_ms / 1000, duration_ms % 1000)
}

/// Quote a path for a single-quoted concat `file` directive.
pub fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('\'', r"'\''")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/manifest.rs"]
mod tests;
