use std::path::PathBuf;

use crate::foundation::core::{SeriesModel, SeriesPoint};
use crate::foundation::error::{ReelError, ReelResult};
use crate::source::{SeriesRequest, SeriesSource};

/// Reads `<dir>/<SYMBOL>.json`, an array of `{ "label": .., "value": .. }` objects in
/// chronological order. Only the newest `lookback_days` points are kept.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.to_ascii_uppercase()))
    }
}

impl SeriesSource for JsonFileSource {
    fn fetch(&self, request: &SeriesRequest) -> ReelResult<SeriesModel> {
        if request.lookback_days == 0 {
            return Err(ReelError::invalid_input("lookback_days must be non-zero"));
        }
        let path = self.path_for(&request.symbol);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            ReelError::data_unavailable(format!("read '{}': {e}", path.display()))
        })?;
        let points: Vec<SeriesPoint> = serde_json::from_str(&text).map_err(|e| {
            ReelError::data_unavailable(format!("parse '{}': {e}", path.display()))
        })?;
        if points.is_empty() {
            return Err(ReelError::data_unavailable(format!(
                "'{}' contains no points",
                path.display()
            )));
        }
        let series = SeriesModel::new(points)?.tail(request.lookback_days as usize)?;
        tracing::debug!(path = %path.display(), points = series.len(), "loaded series file");
        Ok(series)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/json.rs"]
mod tests;
