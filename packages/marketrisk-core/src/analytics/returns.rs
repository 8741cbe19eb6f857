//! Log return calculation.

use crate::series::{Frame, PriceSeries, ReturnSeries};
use crate::{Error, Result};

/// Convert closing prices into daily log returns.
///
/// For each symbol the value at date `t` is `ln(price[t] / price[t-1])`; the
/// first date has no prior price and is dropped. Rows where any symbol's
/// return is not finite are removed entirely so the columns stay aligned.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `prices` has fewer than 2 rows, no
/// symbols, or a price that is zero or negative.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use marketrisk_core::{compute_returns, Frame};
///
/// let dates = (2..=4)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
///     .collect();
/// let prices = Frame::new(dates, vec!["ACME".into()], vec![vec![100.0, 105.0, 100.8]]).unwrap();
///
/// let returns = compute_returns(&prices).unwrap();
/// assert_eq!(returns.len(), 2);
/// assert!((returns.column("ACME").unwrap()[0] - 1.05_f64.ln()).abs() < 1e-12);
/// ```
pub fn compute_returns(prices: &PriceSeries) -> Result<ReturnSeries> {
    if prices.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "need at least 2 price rows to compute returns, got {}",
            prices.len()
        )));
    }

    if prices.width() == 0 {
        return Err(Error::InvalidInput("prices have no symbol columns".to_string()));
    }

    for (symbol, column) in prices.columns() {
        if let Some(row) = column.iter().position(|&p| p <= 0.0) {
            return Err(Error::InvalidInput(format!(
                "non-positive price {} for {} on {}",
                column[row],
                symbol,
                prices.dates()[row]
            )));
        }
    }

    let columns = prices
        .columns()
        .map(|(_, column)| column.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
        .collect();

    let returns = Frame::from_parts(
        prices.dates()[1..].to_vec(),
        prices.symbols().to_vec(),
        columns,
    )
    .drop_non_finite_rows();

    let dropped = prices.len() - 1 - returns.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped return rows with non-finite values");
    }

    Ok(returns)
}
