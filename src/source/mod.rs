//! Upstream data collaborators.

use crate::foundation::core::SeriesModel;
use crate::foundation::error::ReelResult;

/// CryptoCompare daily-close client.
pub mod cryptocompare;
/// Local JSON series files.
pub mod json;

/// What to fetch for one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    /// Number of most recent daily points wanted.
    pub lookback_days: u32,
}

impl SeriesRequest {
    pub fn new(symbol: impl Into<String>, lookback_days: u32) -> Self {
        Self {
            symbol: symbol.into(),
            lookback_days,
        }
    }
}

/// Supplies an ordered series for a symbol.
///
/// Implementations report fetch failures and empty results as
/// [`ReelError::DataUnavailable`](crate::ReelError::DataUnavailable).
pub trait SeriesSource {
    fn fetch(&self, request: &SeriesRequest) -> ReelResult<SeriesModel>;
}
