//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_svg::ChartSvgAdapter;
use crate::adapters::console_table::format_results_table;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::xlsx_report_adapter::xlsx_exporter;
use crate::domain::backtest::{build_report, BacktestConfig, DEFAULT_MIN_BARS};
use crate::domain::config_validation::{
    read_bool, read_date, read_f64, read_usize, validate_backtest_config,
    validate_strategy_config,
};
use crate::domain::error::SignalbenchError;
use crate::domain::execution::SimulationConfig;
use crate::domain::report::BacktestReport;
use crate::domain::strategy::{StrategyRegistry, StrategySpec};
use crate::domain::tickers::{load_tickers_csv, parse_tickers, Ticker};
use crate::obs;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "signalbench",
    about = "Backtest canned indicator strategies against buy-and-hold"
)]
pub struct Cli {
    /// Log filter, e.g. `info` or `signalbench=debug`. SIGNALBENCH_LOG overrides it.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every strategy against every ticker and print the results table
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Only backtest this ticker
        #[arg(long)]
        ticker: Option<String>,
        /// Write every export into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Validate and print the plan without fetching data
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the built-in strategies and their default parameters
    Strategies,
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    if let Err(e) = obs::init_tracing(&cli.log_level) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    let outcome = match cli.command {
        Command::Run {
            config,
            ticker,
            output_dir,
            dry_run,
        } => run_backtest(&config, ticker.as_deref(), output_dir.as_deref(), dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::Strategies => {
            print!("{}", format_strategy_list(&StrategyRegistry::builtin()));
            Ok(())
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SignalbenchError> {
    tracing::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Load a config file and run every validation step on it.
pub fn load_validated_config(
    path: &Path,
    registry: &StrategyRegistry,
) -> Result<FileConfigAdapter, SignalbenchError> {
    let adapter = load_config(path)?;
    validate_backtest_config(&adapter)?;
    validate_strategy_config(&adapter, registry)?;
    Ok(adapter)
}

pub fn resolve_tickers(adapter: &dyn ConfigPort) -> Result<Vec<Ticker>, SignalbenchError> {
    if let Some(list) = adapter
        .get_string("backtest", "tickers")
        .filter(|s| !s.trim().is_empty())
    {
        return Ok(parse_tickers(&list)?);
    }
    match adapter
        .get_string("backtest", "tickers_file")
        .filter(|s| !s.trim().is_empty())
    {
        Some(path) => Ok(load_tickers_csv(Path::new(path.trim()))?),
        None => Err(SignalbenchError::config_missing("backtest", "tickers")),
    }
}

/// Narrow the list to `--ticker`. An unlisted symbol is backtested under its
/// own name.
pub fn apply_ticker_override(tickers: Vec<Ticker>, ticker_override: Option<&str>) -> Vec<Ticker> {
    let Some(wanted) = ticker_override.map(|t| t.trim().to_uppercase()) else {
        return tickers;
    };
    match tickers.into_iter().find(|t| t.symbol == wanted) {
        Some(t) => vec![t],
        None => vec![Ticker::new(&wanted, "")],
    }
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    registry: &StrategyRegistry,
) -> Result<BacktestConfig, SignalbenchError> {
    let selection = adapter.get_string("backtest", "strategies");
    Ok(BacktestConfig {
        start_date: read_date(adapter, "start_date")?,
        end_date: read_date(adapter, "end_date")?,
        simulation: SimulationConfig {
            initial_capital: read_f64(adapter, "backtest", "initial_capital", 10_000.0)?,
            commission: read_f64(adapter, "backtest", "commission", 0.0)?,
            fractional_shares: read_bool(adapter, "backtest", "fractional_shares", true)?,
        },
        min_bars: read_usize(adapter, "backtest", "min_bars", DEFAULT_MIN_BARS)?,
        tickers: resolve_tickers(adapter)?,
        strategies: registry.resolve(selection.as_deref(), adapter)?,
    })
}

pub fn build_data_port(adapter: &dyn ConfigPort) -> Result<Box<dyn DataPort>, SignalbenchError> {
    let source = adapter
        .get_string("data", "source")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "csv".to_string());

    match source.as_str() {
        "csv" => {
            let dir = adapter
                .get_string("data", "csv_dir")
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| SignalbenchError::config_missing("data", "csv_dir"))?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir.trim()))))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => Ok(Box::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?)),
        other => Err(SignalbenchError::config_invalid(
            "data",
            "source",
            format!("unsupported data source in this build: {other}"),
        )),
    }
}

/// Where each export goes. `None` means the export is off.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTargets {
    pub csv: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub chart_dir: Option<PathBuf>,
    pub chart_strategy: String,
}

/// Read `[report]`. `--output-dir` turns every export on with default file
/// names inside that directory.
pub fn build_report_targets(
    adapter: &dyn ConfigPort,
    registry: &StrategyRegistry,
    output_dir: Option<&Path>,
) -> Result<ReportTargets, SignalbenchError> {
    let chart_strategy = adapter
        .get_string("report", "chart_strategy")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "sma_crossover".to_string());
    if registry.get(&chart_strategy).is_none() {
        return Err(SignalbenchError::config_invalid(
            "report",
            "chart_strategy",
            format!("unknown strategy: {chart_strategy}"),
        ));
    }

    if let Some(dir) = output_dir {
        return Ok(ReportTargets {
            csv: Some(dir.join("results.csv")),
            xlsx: Some(dir.join("results.xlsx")),
            html: Some(dir.join("report.html")),
            chart_dir: Some(dir.join("charts")),
            chart_strategy,
        });
    }

    let path = |key: &str| {
        adapter
            .get_string("report", key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    };
    Ok(ReportTargets {
        csv: path("csv_path"),
        xlsx: path("xlsx_path"),
        html: path("html_path"),
        chart_dir: path("chart_dir"),
        chart_strategy,
    })
}

/// SMA periods drawn on charts: those of the selected crossover strategy.
fn chart_overlays(strategies: &[StrategySpec]) -> Vec<usize> {
    strategies
        .iter()
        .find_map(|spec| match spec {
            StrategySpec::SmaCrossover(s) => Some(vec![s.fast(), s.slow()]),
            _ => None,
        })
        .unwrap_or_default()
}

pub fn write_exports(
    report: &BacktestReport,
    targets: &ReportTargets,
    strategies: &[StrategySpec],
) -> Result<(), SignalbenchError> {
    let overlays = chart_overlays(strategies);
    let mut exports: Vec<(Box<dyn ReportPort>, &Path)> = Vec::new();

    if let Some(path) = &targets.csv {
        exports.push((Box::new(CsvReportAdapter), path));
    }
    if let Some(path) = &targets.xlsx {
        match xlsx_exporter() {
            Some(exporter) => exports.push((exporter, path)),
            None => tracing::warn!(
                "{}; skipping {}",
                SignalbenchError::ExportUnavailable {
                    format: "xlsx".into()
                },
                path.display()
            ),
        }
    }
    if let Some(path) = &targets.html {
        exports.push((
            Box::new(HtmlReportAdapter::new(overlays.clone(), &targets.chart_strategy)),
            path,
        ));
    }
    if let Some(dir) = &targets.chart_dir {
        exports.push((
            Box::new(ChartSvgAdapter::new(overlays, &targets.chart_strategy)),
            dir,
        ));
    }

    for (exporter, path) in exports {
        exporter.write(report, path)?;
        tracing::info!("{} written to {}", exporter.format_name(), path.display());
    }
    Ok(())
}

pub fn format_plan(config: &BacktestConfig, targets: &ReportTargets) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Period:      {} to {}\n",
        config.start_date, config.end_date
    ));
    out.push_str(&format!(
        "Capital:     {:.2} (commission {}, {} shares)\n",
        config.simulation.initial_capital,
        config.simulation.commission,
        if config.simulation.fractional_shares {
            "fractional"
        } else {
            "whole"
        }
    ));
    out.push_str(&format!("Min bars:    {}\n", config.min_bars));
    out.push_str("\nTickers:\n");
    for t in &config.tickers {
        out.push_str(&format!("  {} ({})\n", t.symbol, t.name));
    }
    out.push_str("\nStrategies:\n");
    for spec in &config.strategies {
        let strategy = spec.build();
        let indicators: Vec<String> = strategy
            .required_indicators()
            .iter()
            .map(|i| i.to_string())
            .collect();
        out.push_str(&format!(
            "  {} [{}]\n",
            strategy.name(),
            indicators.join(", ")
        ));
    }
    out.push_str("\nExports:\n");
    let describe = |label: &str, path: &Option<PathBuf>| match path {
        Some(p) => format!("  {label}: {}\n", p.display()),
        None => format!("  {label}: off\n"),
    };
    out.push_str(&describe("csv", &targets.csv));
    out.push_str(&describe("xlsx", &targets.xlsx));
    out.push_str(&describe("html", &targets.html));
    out.push_str(&describe("charts", &targets.chart_dir));
    out
}

pub fn format_strategy_list(registry: &StrategyRegistry) -> String {
    let mut out = String::new();
    for entry in registry.entries() {
        out.push_str(&format!(
            "{:<16} {}\n{:<16} defaults: {}\n",
            entry.key, entry.description, "", entry.params
        ));
    }
    out
}

pub fn run_backtest(
    config_path: &Path,
    ticker_override: Option<&str>,
    output_dir: Option<&Path>,
    dry_run: bool,
) -> Result<(), SignalbenchError> {
    let registry = StrategyRegistry::builtin();
    let adapter = load_validated_config(config_path, &registry)?;

    let mut config = build_backtest_config(&adapter, &registry)?;
    config.tickers = apply_ticker_override(config.tickers, ticker_override);
    let targets = build_report_targets(&adapter, &registry, output_dir)?;

    if dry_run {
        print!("{}", format_plan(&config, &targets));
        tracing::info!("dry run complete: configuration is valid");
        return Ok(());
    }

    let data_port = build_data_port(&adapter)?;
    tracing::info!(
        "backtesting {} ticker(s) x {} strateg(ies)",
        config.tickers.len(),
        config.strategies.len()
    );
    let report = build_report(data_port.as_ref(), &config);

    print!("{}", format_results_table(&report));
    if report.is_empty() {
        return Err(SignalbenchError::NoData {
            ticker: "any configured ticker".into(),
        });
    }

    write_exports(&report, &targets, &config.strategies)
}

pub fn run_validate(config_path: &Path) -> Result<(), SignalbenchError> {
    let registry = StrategyRegistry::builtin();
    let adapter = load_validated_config(config_path, &registry)?;
    let config = build_backtest_config(&adapter, &registry)?;
    build_report_targets(&adapter, &registry, None)?;

    for spec in &config.strategies {
        if !adapter.has_section(spec.key()) {
            tracing::info!("[{}] not set, using defaults", spec.key());
        }
    }
    println!(
        "Configuration is valid: {} ticker(s), {} strateg(ies)",
        config.tickers.len(),
        config.strategies.len()
    );
    Ok(())
}

pub fn run_list_symbols(config_path: &Path) -> Result<(), SignalbenchError> {
    let adapter = load_config(config_path)?;
    let data_port = build_data_port(&adapter)?;
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        tracing::warn!("no symbols found");
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_with_overrides() {
        let cli = Cli::parse_from([
            "signalbench",
            "--log-level",
            "debug",
            "run",
            "--config",
            "bench.ini",
            "--ticker",
            "aapl",
            "--dry-run",
        ]);
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Command::Run {
                config,
                ticker,
                output_dir,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("bench.ini"));
                assert_eq!(ticker.as_deref(), Some("aapl"));
                assert!(output_dir.is_none());
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_level_defaults_to_info() {
        let cli = Cli::parse_from(["signalbench", "strategies"]);
        assert_eq!(cli.log_level, "info");
        assert!(matches!(cli.command, Command::Strategies));
    }

    #[test]
    fn ticker_override_keeps_configured_name() {
        let tickers = vec![Ticker::new("AAPL", "Apple"), Ticker::new("MSFT", "Microsoft")];
        assert_eq!(
            apply_ticker_override(tickers.clone(), Some("msft")),
            vec![Ticker::new("MSFT", "Microsoft")]
        );
        assert_eq!(
            apply_ticker_override(tickers.clone(), Some("nvda")),
            vec![Ticker::new("NVDA", "NVDA")]
        );
        assert_eq!(apply_ticker_override(tickers.clone(), None), tickers);
    }

    #[test]
    fn chart_overlays_follow_sma_strategy() {
        use crate::domain::strategy::{MacdCrossover, SmaCrossover};
        let specs = vec![
            StrategySpec::MacdCrossover(MacdCrossover::default()),
            StrategySpec::SmaCrossover(SmaCrossover::new(5, 20).unwrap()),
        ];
        assert_eq!(chart_overlays(&specs), vec![5, 20]);
        assert!(chart_overlays(&specs[..1]).is_empty());
    }

    #[test]
    fn strategy_list_names_every_key() {
        let text = format_strategy_list(&StrategyRegistry::builtin());
        for key in ["sma_crossover", "rsi_threshold", "macd_crossover"] {
            assert!(text.contains(key));
        }
        assert!(text.contains("defaults: fast = 12, slow = 26, signal = 9"));
    }
}
