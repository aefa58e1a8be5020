use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::config::EncoderConfig;
use crate::encode::sink::{EncodeJob, Encoder};
use crate::foundation::error::{ReelError, ReelResult};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Options for [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    pub program: PathBuf,
    pub timeout: Duration,
    pub preset: String,
    pub audio_bitrate: String,
}

impl FfmpegEncoderOpts {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let defaults = EncoderConfig::default();
        Self {
            program: program.into(),
            timeout: Duration::from_secs(defaults.timeout_secs),
            preset: defaults.preset,
            audio_bitrate: defaults.audio_bitrate,
        }
    }

    pub fn from_config(cfg: &EncoderConfig) -> Self {
        Self {
            program: cfg.resolve_ffmpeg_path(),
            timeout: Duration::from_secs(cfg.timeout_secs),
            preset: cfg.preset.clone(),
            audio_bitrate: cfg.audio_bitrate.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Encoder that runs the system `ffmpeg` binary over a concat manifest.
///
/// We use the `ffmpeg` executable rather than linking libav so there are no native dev
/// header/lib requirements.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    opts: FfmpegEncoderOpts,
}

impl FfmpegEncoder {
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &FfmpegEncoderOpts {
        &self.opts
    }

    /// Build the full command line for `job` without running it.
    pub fn command(&self, job: &EncodeJob) -> Command {
        let mut cmd = Command::new(&self.opts.program);
        cmd.args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&job.manifest_path);

        if let Some(audio) = job.audio.as_ref() {
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args(["-c:a", "aac", "-b:a", &self.opts.audio_bitrate]);
        } else {
            cmd.arg("-an");
        }

        cmd.args([
            "-c:v",
            "libx264",
            "-preset",
            &self.opts.preset,
            "-pix_fmt",
            "yuv420p",
            "-shortest",
            "-movflags",
            "+faststart",
        ])
        .arg(&job.out_path);
        cmd
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob) -> ReelResult<()> {
        if let Some(audio) = job.audio.as_ref()
            && (audio.sample_rate == 0 || audio.channels == 0)
        {
            return Err(ReelError::invalid_input(
                "audio sample_rate and channels must be non-zero when audio is enabled",
            ));
        }
        ensure_parent_dir(&job.out_path)?;

        let mut cmd = self.command(job);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::debug!(program = %self.opts.program.display(), "spawning encoder");
        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encoding_failed(
                "spawn failed",
                format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.opts.program.display()
                ),
            )
        })?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encoding_failed("spawn failed", "no stderr pipe"))?;
        // Grandchildren of a wrapper script may keep the pipe open after the child exits; the
        // drain is awaited for at most STDERR_GRACE.
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            let read = stderr.read_to_end(&mut stderr_bytes).map(|_| stderr_bytes);
            let _ = tx.send(read);
        });

        let status = wait_with_timeout(&mut child, self.opts.timeout)?;
        let stderr_bytes = match rx.recv_timeout(STDERR_GRACE) {
            Ok(read) => read.map_err(|e| anyhow::anyhow!("encoder stderr read failed: {e}"))?,
            Err(_) => {
                tracing::warn!("encoder stderr still open after exit; continuing without it");
                Vec::new()
            }
        };

        let stderr = String::from_utf8_lossy(&stderr_bytes);
        if !status.success() {
            return Err(ReelError::encoding_failed(
                status.to_string(),
                stderr.trim().to_string(),
            ));
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "encoder diagnostics");
        }
        Ok(())
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> ReelResult<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        let polled = child
            .try_wait()
            .map_err(|e| anyhow::anyhow!("failed to poll encoder process: {e}"))?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            tracing::warn!(timeout_secs = timeout.as_secs_f64(), "encoder timed out; killing");
            // The process may have exited between the poll and the kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::Timeout(timeout));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn is_ffmpeg_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
