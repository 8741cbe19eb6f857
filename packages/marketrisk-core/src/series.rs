//! Date-indexed tables of per-symbol values.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A date-indexed table with one `f64` column per symbol.
///
/// Dates are strictly increasing and symbols are unique. Every column holds
/// exactly one value per date. A `Frame` is never mutated after
/// construction; each computation produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<f64>>,
}

/// Closing prices, one column per symbol.
pub type PriceSeries = Frame;

/// Daily log returns derived from a [`PriceSeries`].
pub type ReturnSeries = Frame;

/// Trailing-window annualized volatility.
pub type RollingVolatilitySeries = Frame;

/// Decline of the cumulative return index from its running peak.
pub type DrawdownSeries = Frame;

impl Frame {
    /// Build a frame from a date index, symbol names and one column per symbol.
    ///
    /// Fails with [`Error::InvalidInput`] when dates are not strictly
    /// increasing, symbols repeat, or a column length differs from the index.
    pub fn new(dates: Vec<NaiveDate>, symbols: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if symbols.len() != columns.len() {
            return Err(Error::InvalidInput(format!(
                "{} symbols but {} columns",
                symbols.len(),
                columns.len()
            )));
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidInput(format!(
                "dates must be strictly increasing: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        let mut seen = BTreeSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(Error::InvalidInput(format!("duplicate symbol: {}", symbol)));
            }
        }

        for (symbol, column) in symbols.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(Error::InvalidInput(format!(
                    "column {} has {} values for {} dates",
                    symbol,
                    column.len(),
                    dates.len()
                )));
            }
        }

        Ok(Self {
            dates,
            symbols,
            columns,
        })
    }

    /// An empty frame (no rows) with the given symbols.
    pub fn empty(symbols: Vec<String>) -> Self {
        let columns = vec![Vec::new(); symbols.len()];
        Self {
            dates: Vec::new(),
            symbols,
            columns,
        }
    }

    /// Align per-symbol observations on their common dates.
    ///
    /// A date is kept only when every symbol has a value for it
    /// (complete-case alignment). Columns follow the order of `observations`.
    pub fn align(observations: Vec<(String, BTreeMap<NaiveDate, f64>)>) -> Result<Self> {
        let Some((_, first)) = observations.first() else {
            return Err(Error::InvalidInput("no symbols to align".to_string()));
        };

        let all_dates: BTreeSet<NaiveDate> = observations
            .iter()
            .flat_map(|(_, series)| series.keys().copied())
            .collect();

        let dates: Vec<NaiveDate> = first
            .keys()
            .copied()
            .filter(|date| observations.iter().all(|(_, series)| series.contains_key(date)))
            .collect();

        let dropped = all_dates.len() - dates.len();
        if dropped > 0 {
            tracing::warn!(
                dropped,
                kept = dates.len(),
                "dropped dates missing a price for at least one symbol"
            );
        }

        let mut symbols = Vec::with_capacity(observations.len());
        let mut columns = Vec::with_capacity(observations.len());
        for (symbol, series) in observations {
            columns.push(dates.iter().map(|date| series[date]).collect());
            symbols.push(symbol);
        }

        Self::new(dates, symbols, columns)
    }

    /// The date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column names in order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of symbol columns.
    pub fn width(&self) -> usize {
        self.symbols.len()
    }

    /// Look up a column by symbol.
    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Iterate over `(symbol, column)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Value at a given date for a symbol.
    pub fn value(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(symbol).map(|column| column[row])
    }

    /// A new frame holding only `symbols`, in that order.
    pub fn select(&self, symbols: &[String]) -> Result<Self> {
        let mut columns = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let column = self
                .column(symbol)
                .ok_or_else(|| Error::UnknownSymbol(symbol.clone()))?;
            columns.push(column.to_vec());
        }
        Self::new(self.dates.clone(), symbols.to_vec(), columns)
    }

    /// A new frame keeping only rows for which every value is finite.
    pub(crate) fn drop_non_finite_rows(self) -> Self {
        let keep: Vec<bool> = (0..self.dates.len())
            .map(|row| self.columns.iter().all(|column| column[row].is_finite()))
            .collect();

        if keep.iter().all(|&k| k) {
            return self;
        }

        let dates = self
            .dates
            .iter()
            .zip(&keep)
            .filter(|&(_, &k)| k)
            .map(|(date, _)| *date)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .zip(&keep)
                    .filter(|&(_, &k)| k)
                    .map(|(value, _)| *value)
                    .collect()
            })
            .collect();

        Self {
            dates,
            symbols: self.symbols,
            columns,
        }
    }

    /// Build a frame whose invariants the caller already upholds.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, symbols: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(symbols.len(), columns.len());
        debug_assert!(columns.iter().all(|column| column.len() == dates.len()));
        Self {
            dates,
            symbols,
            columns,
        }
    }
}
