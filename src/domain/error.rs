//! Domain error types.

use crate::domain::tickers::TickerListError;

/// Top-level error type for signalbench.
#[derive(Debug, thiserror::Error)]
pub enum SignalbenchError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    TickerList(#[from] TickerListError),

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("invalid parameters for {strategy}: {reason}")]
    InvalidStrategyParams { strategy: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("{format} export is not available in this build")]
    ExportUnavailable { format: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalbenchError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SignalbenchError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config_missing(section: &str, key: &str) -> Self {
        SignalbenchError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&SignalbenchError> for std::process::ExitCode {
    fn from(err: &SignalbenchError) -> Self {
        let code: u8 = match err {
            SignalbenchError::Io(_)
            | SignalbenchError::Report { .. }
            | SignalbenchError::ExportUnavailable { .. } => 1,
            SignalbenchError::ConfigParse { .. }
            | SignalbenchError::ConfigMissing { .. }
            | SignalbenchError::ConfigInvalid { .. }
            | SignalbenchError::TickerList(_) => 2,
            SignalbenchError::Data { .. } => 3,
            SignalbenchError::UnknownStrategy { .. }
            | SignalbenchError::InvalidStrategyParams { .. } => 4,
            SignalbenchError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_message_names_section_and_key() {
        let err = SignalbenchError::config_invalid("backtest", "commission", "must be below 1");
        assert_eq!(
            err.to_string(),
            "invalid config value [backtest] commission: must be below 1"
        );
    }

    #[test]
    fn no_data_message_names_ticker() {
        let err = SignalbenchError::NoData {
            ticker: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "no data for AAPL");
    }

    #[test]
    fn ticker_list_error_is_transparent() {
        let err: SignalbenchError = TickerListError::DuplicateTicker("MSFT".into()).into();
        assert_eq!(err.to_string(), "duplicate ticker: MSFT");
    }
}
