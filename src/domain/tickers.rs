//! Ticker lists: `(symbol, display name)` pairs from config or a CSV file.

use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    pub symbol: String,
    pub name: String,
}

impl Ticker {
    pub fn new(symbol: &str, name: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        let name = match name.trim() {
            "" => symbol.clone(),
            n => n.to_string(),
        };
        Ticker { symbol, name }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickerListError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("ticker list is empty")]
    Empty,

    #[error("ticker file {path}: {reason}")]
    File { path: String, reason: String },
}

/// Parse `SYM:Name, SYM2:Name 2, SYM3`. A missing name defaults to the symbol.
pub fn parse_tickers(input: &str) -> Result<Vec<Ticker>, TickerListError> {
    if input.trim().is_empty() {
        return Err(TickerListError::Empty);
    }

    let mut tickers = Vec::new();
    for token in input.split(',') {
        let (symbol, name) = token.split_once(':').unwrap_or((token, ""));
        if symbol.trim().is_empty() {
            return Err(TickerListError::EmptyToken);
        }
        tickers.push(Ticker::new(symbol, name));
    }
    check_unique(&tickers)?;
    Ok(tickers)
}

/// Load a CSV with `Ticker` and optional `Name` columns (header names are
/// case-insensitive). Blank rows are skipped.
pub fn load_tickers_csv(path: &Path) -> Result<Vec<Ticker>, TickerListError> {
    let file_error = |reason: String| TickerListError::File {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| file_error(e.to_string()))?;

    let headers = reader.headers().map_err(|e| file_error(e.to_string()))?.clone();
    let column = |wanted: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(wanted));
    let symbol_col = column("ticker")
        .or_else(|| column("symbol"))
        .ok_or_else(|| file_error("missing Ticker column".to_string()))?;
    let name_col = column("name");

    let mut tickers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| file_error(e.to_string()))?;
        let symbol = record.get(symbol_col).unwrap_or("");
        if symbol.is_empty() {
            continue;
        }
        let name = name_col.and_then(|c| record.get(c)).unwrap_or("");
        tickers.push(Ticker::new(symbol, name));
    }

    if tickers.is_empty() {
        return Err(TickerListError::Empty);
    }
    check_unique(&tickers)?;
    Ok(tickers)
}

fn check_unique(tickers: &[Ticker]) -> Result<(), TickerListError> {
    let mut seen = HashSet::new();
    for t in tickers {
        if !seen.insert(t.symbol.as_str()) {
            return Err(TickerListError::DuplicateTicker(t.symbol.clone()));
        }
    }
    Ok(())
}
