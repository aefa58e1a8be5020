//! Application configuration.
//!
//! Configuration is read once from a TOML file (or taken from defaults) and handed to
//! [`Pipeline::new`](crate::Pipeline::new) as an explicit value. Every tuning constant of the
//! sampling, timing and tone stages lives here so it can be overridden per deployment.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};

/// Placeholder shipped in sample configs; treated as "no key configured".
pub const API_KEY_PLACEHOLDER: &str = "YOUR_CRYPTOCOMPARE_API_KEY_GOES_HERE";

/// Default encoder program looked up on `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub encoder: EncoderConfig,
    pub timing: TimingConfig,
    pub tone: ToneConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub api_key: String,
    /// Quote currency used for every symbol (`tsym`).
    pub base_currency: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Maximum points requested per page.
    pub page_limit: u32,
    pub page_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            base_currency: "USD".to_string(),
            base_url: "https://min-api.cryptocompare.com".to_string(),
            request_timeout_secs: 20,
            page_limit: 2000,
            page_delay_ms: 200,
        }
    }
}

impl SourceConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }

    /// The key with everything past the first four characters masked.
    pub fn masked_api_key(&self) -> String {
        let head: String = self.api_key.chars().take(4).collect();
        format!("{head}****")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    pub ffmpeg_path: PathBuf,
    pub timeout_secs: u64,
    pub preset: String,
    pub audio_bitrate: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            timeout_secs: 120,
            preset: "medium".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Return the configured encoder if it is an executable file, otherwise `ffmpeg` on `PATH`.
    pub fn resolve_ffmpeg_path(&self) -> PathBuf {
        let configured = &self.ffmpeg_path;
        if configured.as_os_str().is_empty() || configured == Path::new(DEFAULT_FFMPEG) {
            return PathBuf::from(DEFAULT_FFMPEG);
        }
        if is_executable_file(configured) {
            return configured.clone();
        }
        tracing::warn!(
            path = %configured.display(),
            "configured ffmpeg_path is not an executable file; falling back to 'ffmpeg' on PATH"
        );
        PathBuf::from(DEFAULT_FFMPEG)
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Frame sampling and duration budget constants.
///
/// These values were tuned by eye; there is no derivation behind them beyond "a year of daily
/// data should play in roughly five to eight seconds".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub target_frame_count: usize,
    pub base_budget_ms: u64,
    /// Frame count above which the budget starts to grow.
    pub growth_threshold: usize,
    pub growth_per_frame_ms: u64,
    pub hold_ms: u64,
    pub floor_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_frame_count: 100,
            base_budget_ms: 5000,
            growth_threshold: 100,
            growth_per_frame_ms: 30,
            hold_ms: 3000,
            floor_ms: 20,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if self.target_frame_count == 0 {
            return Err(ReelError::config("timing.target_frame_count must be non-zero"));
        }
        if self.floor_ms == 0 {
            return Err(ReelError::config("timing.floor_ms must be non-zero"));
        }
        if self.hold_ms < self.floor_ms {
            return Err(ReelError::config(format!(
                "timing.hold_ms ({}) must be >= timing.floor_ms ({})",
                self.hold_ms, self.floor_ms
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToneConfig {
    pub min_freq_hz: f64,
    pub max_freq_hz: f64,
    /// Segment gain in dBFS.
    pub volume_db: f64,
    pub fade_ms: u64,
    pub sample_rate: u32,
    /// Value spans narrower than this map every value to the midpoint pitch.
    pub flat_epsilon: f64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            min_freq_hz: 220.0,
            max_freq_hz: 880.0,
            volume_db: -12.0,
            fade_ms: 15,
            sample_rate: 48_000,
            flat_epsilon: 1e-6,
        }
    }
}

impl ToneConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.min_freq_hz.is_finite() && self.max_freq_hz.is_finite()) {
            return Err(ReelError::config("tone frequencies must be finite"));
        }
        if self.min_freq_hz <= 0.0 || self.max_freq_hz < self.min_freq_hz {
            return Err(ReelError::config(format!(
                "tone range [{}, {}] Hz is invalid",
                self.min_freq_hz, self.max_freq_hz
            )));
        }
        if self.sample_rate == 0 {
            return Err(ReelError::config("tone.sample_rate must be non-zero"));
        }
        if self.max_freq_hz * 2.0 >= f64::from(self.sample_rate) {
            return Err(ReelError::config(format!(
                "tone.max_freq_hz {} is above the Nyquist limit for {} Hz",
                self.max_freq_hz, self.sample_rate
            )));
        }
        if !self.volume_db.is_finite() || self.volume_db > 0.0 {
            return Err(ReelError::config("tone.volume_db must be <= 0 dBFS"));
        }
        if !self.flat_epsilon.is_finite() || self.flat_epsilon < 0.0 {
            return Err(ReelError::config("tone.flat_epsilon must be >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Faint diagonal text drawn behind the chart.
    pub watermark: Option<String>,
    /// Known symbols; a symbol's position picks its line colour.
    pub symbols: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            watermark: None,
            symbols: [
                "BTC", "ETH", "XRP", "LTC", "ADA", "SOL", "DOGE", "DOT", "SHIB", "AVAX", "MATIC",
                "TRX", "ETC", "XMR", "RVN", "KAS",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::config("render width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output needs even dimensions.
            return Err(ReelError::config(
                "render width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> ReelResult<Self> {
        let cfg: AppConfig =
            toml::from_str(text).map_err(|e| ReelError::config(format!("parse config: {e}")))?;
        cfg.validate()?;
        cfg.log_source_state();
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.timing.validate()?;
        self.tone.validate()?;
        self.render.validate()?;
        if self.encoder.timeout_secs == 0 {
            return Err(ReelError::config("encoder.timeout_secs must be non-zero"));
        }
        Ok(())
    }

    fn log_source_state(&self) {
        if self.source.has_api_key() {
            tracing::debug!(api_key = %self.source.masked_api_key(), "api key loaded");
        } else {
            tracing::error!("source.api_key is not set; network data fetching will fail");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
