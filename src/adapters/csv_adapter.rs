//! CSV directory data adapter.
//!
//! One file per ticker at `{base_path}/{TICKER}.csv` with a header row.
//! Columns are located by name (case-insensitive), so exports with extra
//! columns such as `Adj Close` load as-is. Rows whose price fields are
//! empty or `null`, or whose close is not positive, are skipped. `NaN` or
//! infinite prices are a data error.

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SignalbenchError> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| SignalbenchError::Data {
                reason: format!("missing {name} column"),
            })
        };
        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<Option<f64>, SignalbenchError> {
    let raw = record.get(index).unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    let value = raw.parse::<f64>().map_err(|e| SignalbenchError::Data {
        reason: format!("invalid {name} value {raw:?}: {e}"),
    })?;
    if !value.is_finite() {
        return Err(SignalbenchError::Data {
            reason: format!("non-finite {name} value {raw:?}"),
        });
    }
    Ok(Some(value))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Result<NaiveDate, SignalbenchError> {
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| SignalbenchError::Data {
        reason: format!("invalid date {raw:?}: {e}"),
    })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalbenchError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SignalbenchError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SignalbenchError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let cols = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SignalbenchError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = parse_date(record.get(cols.date).unwrap_or(""))?;
            if date < start_date || date > end_date {
                continue;
            }

            let (Some(open), Some(high), Some(low), Some(close)) = (
                parse_price(&record, cols.open, "open")?,
                parse_price(&record, cols.high, "high")?,
                parse_price(&record, cols.low, "low")?,
                parse_price(&record, cols.close, "close")?,
            ) else {
                continue;
            };
            if close <= 0.0 {
                tracing::debug!(ticker, %date, close, "skipping row with non-positive close");
                continue;
            }

            let volume = match cols.volume {
                Some(index) => parse_price(&record, index, "volume")?.unwrap_or(0.0) as i64,
                None => 0,
            };

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalbenchError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SignalbenchError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                symbols.push(stem.to_string_lossy().to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
