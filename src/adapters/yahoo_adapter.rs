//! Yahoo Finance chart API data adapter.
//!
//! Blocking fetch of daily bars from the v8 chart endpoint. One request per
//! ticker and no retries; a failed request skips the ticker. Bar dates are
//! the exchange-local trading day, using the `gmtoffset` in the chart meta.

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
}

fn data_error(reason: impl Into<String>) -> SignalbenchError {
    SignalbenchError::Data {
        reason: reason.into(),
    }
}

impl YahooAdapter {
    pub fn new() -> Result<Self, SignalbenchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) signalbench")
            .build()
            .map_err(|e| data_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!("{BASE_URL}/{ticker}?period1={start_ts}&period2={end_ts}&interval=1d")
    }

    /// Turn a chart API body into bars. Days with no usable close are dropped.
    fn parse_chart(ticker: &str, body: &str) -> Result<Vec<OhlcvBar>, SignalbenchError> {
        let resp: ChartResponse = serde_json::from_str(body)
            .map_err(|e| data_error(format!("unexpected chart response for {ticker}: {e}")))?;

        let results = match (resp.chart.result, resp.chart.error) {
            (Some(results), _) => results,
            (None, Some(err)) => {
                return Err(data_error(format!("{}: {}", err.code, err.description)));
            }
            (None, None) => return Err(data_error("empty chart result")),
        };
        let Some(data) = results.into_iter().next() else {
            return Ok(Vec::new());
        };
        let offset = data.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);
        let timestamps = data.timestamp.unwrap_or_default();
        let Some(quote) = data.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| data_error(format!("invalid timestamp: {ts}")))?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            if !close.is_finite() || close <= 0.0 {
                tracing::debug!(ticker, %date, close, "skipping bar with unusable close");
                continue;
            }
            let field = |values: &[Option<f64>]| values.get(i).copied().flatten().unwrap_or(close);

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open: field(&quote.open),
                high: field(&quote.high),
                low: field(&quote.low),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }
        Ok(bars)
    }
}

impl DataPort for YahooAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalbenchError> {
        let url = Self::chart_url(ticker, start_date, end_date);
        tracing::debug!(ticker, %url, "fetching chart");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| data_error(format!("request for {ticker} failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| data_error(format!("reading response for {ticker} failed: {e}")))?;
        if !status.is_success() && !body.contains("\"chart\"") {
            return Err(data_error(format!("HTTP {status} for {ticker}")));
        }

        let bars = Self::parse_chart(ticker, &body)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        Err(data_error("the yahoo source cannot list symbols"))
    }
}
