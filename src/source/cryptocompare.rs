use std::time::Duration;

use serde::Deserialize;

use crate::config::SourceConfig;
use crate::foundation::core::{SeriesModel, SeriesPoint};
use crate::foundation::error::{ReelError, ReelResult};
use crate::source::{SeriesRequest, SeriesSource};

#[derive(Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Data", default)]
    data: Option<HistoData>,
}

#[derive(Deserialize)]
struct HistoData {
    #[serde(rename = "TimeFrom", default)]
    time_from: Option<i64>,
    #[serde(rename = "Data", default)]
    data: Vec<HistoPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub(crate) struct HistoPoint {
    pub(crate) time: i64,
    pub(crate) close: f64,
}

/// One decoded `histoday` response.
#[derive(Debug, PartialEq)]
pub(crate) enum Page {
    Points {
        points: Vec<HistoPoint>,
        time_from: Option<i64>,
    },
    Empty {
        message: String,
    },
}

/// Daily close prices from the CryptoCompare `histoday` API.
///
/// History is fetched newest-first in pages of at most `page_limit` points, walking `toTs`
/// backward until `lookback_days` points are collected or the API runs out of history.
pub struct CryptoCompareSource {
    cfg: SourceConfig,
    client: reqwest::blocking::Client,
}

impl CryptoCompareSource {
    pub fn new(cfg: SourceConfig) -> ReelResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(|e| ReelError::config(format!("failed to build http client: {e}")))?;
        Ok(Self { cfg, client })
    }

    fn fetch_page(&self, symbol: &str, limit: usize, to_ts: i64) -> ReelResult<Page> {
        let url = format!("{}/data/v2/histoday", self.cfg.base_url.trim_end_matches('/'));
        let limit = limit.to_string();
        let to_ts = to_ts.to_string();
        let body = self
            .client
            .get(url)
            .query(&[
                ("fsym", symbol),
                ("tsym", self.cfg.base_currency.as_str()),
                ("limit", limit.as_str()),
                ("toTs", to_ts.as_str()),
                ("api_key", self.cfg.api_key.as_str()),
            ])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| {
                ReelError::data_unavailable(format!("request for {symbol} failed: {e}"))
            })?;
        parse_page(&body)
    }
}

impl SeriesSource for CryptoCompareSource {
    #[tracing::instrument(skip(self, request), fields(symbol = %request.symbol, days = request.lookback_days))]
    fn fetch(&self, request: &SeriesRequest) -> ReelResult<SeriesModel> {
        if !self.cfg.has_api_key() {
            return Err(ReelError::data_unavailable("source.api_key is not configured"));
        }
        if request.lookback_days == 0 {
            return Err(ReelError::invalid_input("lookback_days must be non-zero"));
        }

        let page_limit = self.cfg.page_limit.max(1) as usize;
        let mut remaining = request.lookback_days as usize;
        let mut to_ts = chrono::Utc::now().timestamp();
        let mut pages: Vec<Vec<HistoPoint>> = Vec::new();

        while remaining > 0 {
            let limit = remaining.min(page_limit);
            match self.fetch_page(&request.symbol, limit, to_ts)? {
                Page::Empty { message } => {
                    tracing::warn!(%message, "api returned no data");
                    break;
                }
                Page::Points { points, time_from } => {
                    let got = points.len();
                    pages.push(points);
                    remaining = remaining.saturating_sub(got);
                    if got < limit {
                        tracing::info!("end of available history reached");
                        break;
                    }
                    let Some(from) = time_from else { break };
                    to_ts = from - 1;
                }
            }
            if remaining > 0 {
                std::thread::sleep(Duration::from_millis(self.cfg.page_delay_ms));
            }
        }

        let series = series_from_pages(pages, request.lookback_days as usize)?;
        tracing::info!(points = series.len(), "fetched series");
        Ok(series)
    }
}

pub(crate) fn parse_page(body: &str) -> ReelResult<Page> {
    let resp: HistoResponse = serde_json::from_str(body)
        .map_err(|e| ReelError::data_unavailable(format!("malformed api response: {e}")))?;
    let message = resp.message.unwrap_or_default();
    if resp.response.as_deref() == Some("Error") {
        return Ok(Page::Empty { message });
    }
    match resp.data {
        Some(d) if !d.data.is_empty() => Ok(Page::Points {
            points: d.data,
            time_from: d.time_from,
        }),
        _ => Ok(Page::Empty { message }),
    }
}

/// Join newest-first pages into one chronological series of at most `keep` points.
pub(crate) fn series_from_pages(
    pages: Vec<Vec<HistoPoint>>,
    keep: usize,
) -> ReelResult<SeriesModel> {
    let mut points = Vec::new();
    for page in pages.into_iter().rev() {
        for p in page {
            points.push(SeriesPoint {
                label: format_day(p.time)?,
                value: p.close,
            });
        }
    }
    if points.is_empty() {
        return Err(ReelError::data_unavailable("api returned an empty series"));
    }
    SeriesModel::new(points)?.tail(keep)
}

fn format_day(unix_secs: i64) -> ReelResult<String> {
    chrono::DateTime::from_timestamp(unix_secs, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ReelError::data_unavailable(format!("invalid timestamp {unix_secs}")))
}

#[cfg(test)]
#[path = "../../tests/unit/source/cryptocompare.rs"]
mod tests;
