//! INI file configuration adapter.

use crate::domain::error::SignalbenchError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalbenchError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| SignalbenchError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn has_section(&self, section: &str) -> bool {
        let wanted = section.to_lowercase();
        self.config.sections().iter().any(|s| *s == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[backtest]
start_date = 2020-01-01
tickers = AAPL:Apple Inc., MSFT:Microsoft

[data]
csv_dir = ./data
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "tickers"),
            Some("AAPL:Apple Inc., MSFT:Microsoft".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "csv_dir"),
            Some("./data".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[backtest]\ncommission = 0\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn values_are_returned_verbatim() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ninitial_capital = lots\nfractional_shares = Yes\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_string("backtest", "initial_capital"),
            Some("lots".to_string())
        );
        assert_eq!(
            adapter.get_string("backtest", "fractional_shares"),
            Some("Yes".to_string())
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter =
            FileConfigAdapter::from_string("[Backtest]\nStart_Date = 2024-01-01\n").unwrap();
        assert_eq!(
            adapter.get_string("backtest", "start_date"),
            Some("2024-01-01".to_string())
        );
    }

    #[test]
    fn has_section_is_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[RSI_Threshold]\nperiod = 9\n").unwrap();
        assert!(adapter.has_section("rsi_threshold"));
        assert!(!adapter.has_section("macd_crossover"));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\nhtml_path = out/report.html\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "html_path"),
            Some("out/report.html".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigParse { file, .. } if file.contains("config.ini")));
    }
}
