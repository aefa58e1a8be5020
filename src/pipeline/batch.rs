use std::path::PathBuf;

use crate::pipeline::{Pipeline, RunFailure, RunOutcome};
use crate::source::SeriesRequest;

/// Emitted as each batch item starts and completes. `index` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    Started {
        index: usize,
        total: usize,
        symbol: String,
    },
    Finished {
        index: usize,
        total: usize,
        symbol: String,
        artifact: PathBuf,
    },
    Failed {
        index: usize,
        total: usize,
        symbol: String,
        failure: RunFailure,
    },
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::Started {
                index,
                total,
                symbol,
            } => write!(f, "Processing {index}/{total}: {symbol}..."),
            ProgressEvent::Finished {
                index,
                total,
                symbol,
                artifact,
            } => write!(f, "Finished {index}/{total}: {symbol} -> {}", artifact.display()),
            ProgressEvent::Failed {
                index,
                total,
                symbol,
                failure,
            } => write!(f, "Failed {index}/{total}: {symbol} ({failure})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesFailure {
    pub symbol: String,
    pub failure: RunFailure,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub requested: usize,
    pub artifacts: Vec<PathBuf>,
    pub failures: Vec<SeriesFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.artifacts.len()
    }

    /// One-line outcome for the whole batch.
    pub fn summary(&self) -> String {
        match (self.requested, self.succeeded()) {
            (0, _) => "No series requested.".to_string(),
            (_, 0) => "Failed to generate any videos. Check the log for errors.".to_string(),
            (n, ok) if ok < n => format!("Completed. Generated {ok} of {n} videos."),
            _ => "All videos generated successfully.".to_string(),
        }
    }
}

impl Pipeline {
    /// Run each request in order. A failed item is reported and the batch moves on.
    pub fn run_batch(
        &self,
        requests: &[SeriesRequest],
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> BatchReport {
        let total = requests.len();
        let mut report = BatchReport {
            requested: total,
            ..BatchReport::default()
        };

        for (i, request) in requests.iter().enumerate() {
            let index = i + 1;
            let symbol = request.symbol.clone();
            on_progress(&ProgressEvent::Started {
                index,
                total,
                symbol: symbol.clone(),
            });

            match self.run(request) {
                RunOutcome::Done { artifact, .. } => {
                    on_progress(&ProgressEvent::Finished {
                        index,
                        total,
                        symbol,
                        artifact: artifact.clone(),
                    });
                    report.artifacts.push(artifact);
                }
                RunOutcome::Failed(failure) => {
                    on_progress(&ProgressEvent::Failed {
                        index,
                        total,
                        symbol: symbol.clone(),
                        failure: failure.clone(),
                    });
                    report.failures.push(SeriesFailure { symbol, failure });
                }
            }
        }

        tracing::info!(
            requested = report.requested,
            succeeded = report.succeeded(),
            "batch complete"
        );
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
