use crate::foundation::error::{ReelError, ReelResult};

/// One observation of the input series.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeriesPoint {
    /// Display label, usually a `YYYY-MM-DD` date.
    pub label: String,
    /// Observed value.
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Validated, immutable input series in chronological order.
///
/// Construction guarantees the series is non-empty and every value is finite.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SeriesModel {
    points: Vec<SeriesPoint>,
}

impl SeriesModel {
    pub fn new(points: Vec<SeriesPoint>) -> ReelResult<Self> {
        if points.is_empty() {
            return Err(ReelError::invalid_input("series must contain at least one point"));
        }
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.value.is_finite()) {
            return Err(ReelError::invalid_input(format!(
                "series value at index {i} ('{}') is not finite",
                p.label
            )));
        }
        Ok(Self { points })
    }

    /// Build a series from parallel label/value columns.
    pub fn from_columns(labels: Vec<String>, values: Vec<f64>) -> ReelResult<Self> {
        if labels.len() != values.len() {
            return Err(ReelError::invalid_input(format!(
                "series columns differ in length: {} labels, {} values",
                labels.len(),
                values.len()
            )));
        }
        Self::new(
            labels
                .into_iter()
                .zip(values)
                .map(|(label, value)| SeriesPoint { label, value })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn point(&self, idx: FrameIndex) -> Option<&SeriesPoint> {
        self.points.get(idx.0)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Global `(min, max)` over every value in the series.
    pub fn value_range(&self) -> ValueRange {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in self.values() {
            min = min.min(v);
            max = max.max(v);
        }
        ValueRange { min, max }
    }

    /// Keep only the newest `n` points.
    pub fn tail(mut self, n: usize) -> ReelResult<Self> {
        if n == 0 {
            return Err(ReelError::invalid_input("series tail length must be non-zero"));
        }
        if self.points.len() > n {
            self.points.drain(..self.points.len() - n);
        }
        Ok(self)
    }
}

/// Closed value interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> ReelResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ReelError::invalid_input(format!(
                "invalid value range [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }
}

/// 0-based position into a [`SeriesModel`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

/// Strictly increasing frame indices ending on the last series point.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameSet {
    indices: Vec<FrameIndex>,
}

impl FrameSet {
    /// Validate `indices` against a series of `series_len` points.
    pub fn new(indices: Vec<FrameIndex>, series_len: usize) -> ReelResult<Self> {
        let Some(last) = indices.last() else {
            return Err(ReelError::invalid_input("frame set must be non-empty"));
        };
        if last.0 + 1 != series_len {
            return Err(ReelError::invalid_input(format!(
                "frame set must end on index {}, got {}",
                series_len.saturating_sub(1),
                last.0
            )));
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReelError::invalid_input(
                "frame set indices must be strictly increasing",
            ));
        }
        Ok(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[FrameIndex] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.indices.iter().copied()
    }

    pub fn last(&self) -> FrameIndex {
        // Non-empty by construction.
        self.indices[self.indices.len() - 1]
    }
}

/// Per-frame play durations in milliseconds; the last entry is the hold.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DurationPlan {
    durations_ms: Vec<u64>,
}

impl DurationPlan {
    /// Validate that the plan is non-empty and no entry drops below `floor_ms`.
    pub fn new(durations_ms: Vec<u64>, floor_ms: u64) -> ReelResult<Self> {
        if durations_ms.is_empty() {
            return Err(ReelError::invalid_input("duration plan must be non-empty"));
        }
        let floor_ms = floor_ms.max(1);
        if let Some((i, d)) = durations_ms.iter().enumerate().find(|(_, d)| **d < floor_ms) {
            return Err(ReelError::invalid_input(format!(
                "duration {d}ms at position {i} is below the {floor_ms}ms floor"
            )));
        }
        Ok(Self { durations_ms })
    }

    pub fn len(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations_ms.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.durations_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.durations_ms.iter().sum()
    }

    pub fn hold_ms(&self) -> u64 {
        self.durations_ms[self.durations_ms.len() - 1]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
