//! Analysis configuration.

use crate::analytics::{DEFAULT_CONFIDENCE, DEFAULT_WINDOW};
use crate::{Error, Result};
use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Symbols analyzed when none are configured.
pub const DEFAULT_SYMBOLS: [&str; 4] = ["PETR4.SA", "ITUB4.SA", "MGLU3.SA", "^BVSP"];

/// Length of the default analysis period.
const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Parameters for one analysis run.
///
/// Passed explicitly into every stage. Every field is optional in the TOML
/// file; missing ones take the values from [`AnalysisConfig::default`]:
///
/// ```toml
/// symbols = ["PETR4.SA", "^BVSP"]
/// start = "2024-01-01"
/// end = "2024-07-01"
/// confidence = 0.99
/// window = 63
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Ticker symbols (uppercase)
    pub symbols: Vec<String>,
    /// First date of the analysis period (inclusive)
    pub start: NaiveDate,
    /// End of the analysis period (exclusive)
    pub end: NaiveDate,
    /// Confidence level for VaR
    pub confidence: f64,
    /// Rolling volatility window in trading days
    pub window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let end = Local::now().date_naive();
        let start = end
            .checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
            .unwrap_or(end);

        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            start,
            end,
            confidence: DEFAULT_CONFIDENCE,
            window: DEFAULT_WINDOW,
        }
    }
}

impl AnalysisConfig {
    /// Get the default config file path.
    ///
    /// Default path: `<config dir>/marketrisk/config.toml`
    /// Can be overridden with `MARKETRISK_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("MARKETRISK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("marketrisk/config.toml"))
            .unwrap_or_else(|| PathBuf::from("marketrisk.toml"))
    }

    /// Load a config file, normalizing symbols.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.symbols = normalize_symbols(config.symbols.iter().map(String::as_str));
        tracing::debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    /// Load a config file, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Replace the symbol list with a comma-separated one.
    pub fn with_symbols(mut self, symbols: &str) -> Self {
        self.symbols = parse_symbols(symbols);
        self
    }

    /// Check every parameter, naming the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::InvalidInput("symbols: at least one is required".to_string()));
        }

        if self.start >= self.end {
            return Err(Error::InvalidInput(format!(
                "start: {} must be before end {}",
                self.start, self.end
            )));
        }

        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::InvalidInput(format!(
                "confidence: must be between 0 and 1 (exclusive), got {}",
                self.confidence
            )));
        }

        if self.window < 2 {
            return Err(Error::InvalidInput(format!(
                "window: must be at least 2, got {}",
                self.window
            )));
        }

        Ok(())
    }
}

/// Parse a comma-separated symbol list.
///
/// Symbols are trimmed and uppercased; empty entries and repeats are dropped.
pub fn parse_symbols(input: &str) -> Vec<String> {
    normalize_symbols(input.split(','))
}

fn normalize_symbols<'a>(symbols: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for symbol in symbols {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() && !out.contains(&symbol) {
            out.push(symbol);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();

        assert_eq!(config.symbols, vec!["PETR4.SA", "ITUB4.SA", "MGLU3.SA", "^BVSP"]);
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.window, 21);
        assert!(config.start < config.end);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(
            parse_symbols(" petr4.sa, ^bvsp ,,PETR4.SA,itub4.sa"),
            vec!["PETR4.SA", "^BVSP", "ITUB4.SA"]
        );
        assert!(parse_symbols(" , ").is_empty());
    }

    #[test]
    fn test_validate_names_parameter() {
        let base = AnalysisConfig {
            symbols: vec!["AAPL".to_string()],
            start: date(2024, 1, 1),
            end: date(2024, 7, 1),
            confidence: 0.95,
            window: 21,
        };
        assert!(base.validate().is_ok());

        let cases = [
            (AnalysisConfig { symbols: Vec::new(), ..base.clone() }, "symbols"),
            (AnalysisConfig { end: date(2024, 1, 1), ..base.clone() }, "start"),
            (AnalysisConfig { confidence: 1.0, ..base.clone() }, "confidence"),
            (AnalysisConfig { confidence: f64::NAN, ..base.clone() }, "confidence"),
            (AnalysisConfig { window: 1, ..base.clone() }, "window"),
        ];

        for (config, parameter) in cases {
            match config.validate() {
                Err(Error::InvalidInput(msg)) => assert!(msg.starts_with(parameter), "{}", msg),
                other => panic!("expected InvalidInput for {}, got {:?}", parameter, other),
            }
        }
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "symbols = [\"aapl\", \" msft \"]\nstart = \"2024-01-02\"\nend = \"2024-03-01\"\nwindow = 10\n",
        )
        .unwrap();

        let config = AnalysisConfig::load(&path).unwrap();

        assert_eq!(config.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(config.start, date(2024, 1, 2));
        assert_eq!(config.end, date(2024, 3, 1));
        assert_eq!(config.window, 10);
        assert_eq!(config.confidence, 0.95);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "window = \"wide\"").unwrap();

        assert!(matches!(AnalysisConfig::load(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.window, 21);
    }

    #[test]
    fn test_with_symbols() {
        let config = AnalysisConfig::default().with_symbols("vale3.sa");
        assert_eq!(config.symbols, vec!["VALE3.SA"]);
    }
}
