//! Closing prices loaded from a JSON file.

use super::PriceProvider;
use crate::series::{Frame, PriceSeries};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Provider backed by a JSON document of closing prices.
///
/// The file maps each symbol to an object of `YYYY-MM-DD` dates and closes:
///
/// ```json
/// {
///   "PETR4.SA": { "2024-01-02": 37.05, "2024-01-03": 37.84 },
///   "^BVSP": { "2024-01-02": 132697.0, "2024-01-03": 132834.0 }
/// }
/// ```
///
/// Symbols match case-insensitively.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    /// Path the prices were read from
    path: PathBuf,
    /// Closing prices keyed by uppercase symbol
    prices: HashMap<String, BTreeMap<NaiveDate, f64>>,
}

impl JsonFileProvider {
    /// Read and parse a price file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)?;
        let provider = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            symbols = provider.prices.len(),
            "loaded price file"
        );
        Ok(Self { path, ..provider })
    }

    /// Parse prices from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, BTreeMap<String, f64>> = serde_json::from_str(content)?;

        let mut prices = HashMap::with_capacity(raw.len());
        for (symbol, series) in raw {
            let symbol = symbol.trim().to_uppercase();
            let mut parsed = BTreeMap::new();
            for (date, close) in series {
                let date = date.parse::<NaiveDate>().map_err(|e| {
                    Error::Retrieval(format!("invalid date {:?} for {}: {}", date, symbol, e))
                })?;
                parsed.insert(date, close);
            }
            prices.insert(symbol, parsed);
        }

        Ok(Self {
            path: PathBuf::new(),
            prices,
        })
    }

    /// Path the prices were read from (empty when parsed from a string).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Symbols available in the file, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.prices.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl PriceProvider for JsonFileProvider {
    fn fetch(&self, symbols: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput("symbols: at least one is required".to_string()));
        }

        if start >= end {
            return Err(Error::InvalidInput(format!(
                "start: {} must be before end {}",
                start, end
            )));
        }

        let mut observations = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let series = self
                .prices
                .get(&symbol.to_uppercase())
                .ok_or_else(|| Error::UnknownSymbol(symbol.clone()))?;
            let in_range = series
                .range(start..end)
                .map(|(date, close)| (*date, *close))
                .collect();
            observations.push((symbol.clone(), in_range));
        }

        let prices = Frame::align(observations)?;
        if prices.is_empty() {
            return Err(Error::EmptyResult(format!(
                "no common prices for {} between {} and {}",
                symbols.join(", "),
                start,
                end
            )));
        }

        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PRICES: &str = r#"{
        "petr4.sa": { "2024-01-02": 37.0, "2024-01-03": 37.5, "2024-01-04": 38.0, "2024-01-05": 37.8 },
        "^BVSP": { "2024-01-02": 132000.0, "2024-01-04": 133000.0, "2024-01-05": 132500.0 }
    }"#;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fetch_aligns_dates() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let prices = provider
            .fetch(&symbols(&["PETR4.SA", "^BVSP"]), date(1), date(31))
            .unwrap();

        assert_eq!(prices.dates(), &[date(2), date(4), date(5)]);
        assert_eq!(prices.column("PETR4.SA"), Some(&[37.0, 38.0, 37.8][..]));
        assert_eq!(prices.column("^BVSP"), Some(&[132000.0, 133000.0, 132500.0][..]));
    }

    #[test]
    fn test_fetch_range_is_half_open() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let prices = provider
            .fetch(&symbols(&["PETR4.SA"]), date(3), date(5))
            .unwrap();

        assert_eq!(prices.dates(), &[date(3), date(4)]);
    }

    #[test]
    fn test_fetch_case_insensitive() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let prices = provider
            .fetch(&symbols(&["^bvsp"]), date(1), date(31))
            .unwrap();

        assert_eq!(prices.symbols(), &["^bvsp".to_string()]);
        assert_eq!(prices.len(), 3);
    }

    #[test]
    fn test_unknown_symbol() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let result = provider.fetch(&symbols(&["PETR4.SA", "XXXX"]), date(1), date(31));

        assert!(matches!(result, Err(Error::UnknownSymbol(s)) if s == "XXXX"));
    }

    #[test]
    fn test_empty_range() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let result = provider.fetch(&symbols(&["PETR4.SA"]), date(10), date(20));

        assert!(matches!(result, Err(Error::EmptyResult(_))));
    }

    #[test]
    fn test_inverted_range() {
        let provider = JsonFileProvider::from_json(PRICES).unwrap();
        let result = provider.fetch(&symbols(&["PETR4.SA"]), date(5), date(2));

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_date() {
        let result = JsonFileProvider::from_json(r#"{ "A": { "02/01/2024": 1.0 } }"#);
        assert!(matches!(result, Err(Error::Retrieval(_))));
    }

    #[test]
    fn test_open_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, PRICES).unwrap();

        let provider = JsonFileProvider::open(&path).unwrap();
        assert_eq!(provider.path(), path.as_path());
        assert_eq!(provider.symbols(), vec!["PETR4.SA", "^BVSP"]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = JsonFileProvider::open(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
