//! Comparative performance of price series.

use crate::series::{Frame, PriceSeries};
use crate::{Error, Result};

/// Rebase every price column to 100 at the first date.
///
/// Lets series with very different price levels (a stock in currency units,
/// an index in points) be compared on one scale.
pub fn normalize_prices(prices: &PriceSeries) -> Result<Frame> {
    if prices.is_empty() {
        return Err(Error::InvalidInput("prices are empty".to_string()));
    }

    let mut columns = Vec::with_capacity(prices.width());
    for (symbol, column) in prices.columns() {
        let base = column[0];
        if base <= 0.0 || !base.is_finite() {
            return Err(Error::InvalidInput(format!(
                "cannot rebase {} on first price {}",
                symbol, base
            )));
        }
        columns.push(column.iter().map(|p| p / base * 100.0).collect());
    }

    Ok(Frame::from_parts(
        prices.dates().to_vec(),
        prices.symbols().to_vec(),
        columns,
    ))
}

/// Holding period return between two prices, as a fraction.
///
/// Fails with [`Error::InvalidInput`] unless `initial` is positive and finite.
pub fn holding_period_return(initial: f64, last: f64) -> Result<f64> {
    if initial <= 0.0 || !initial.is_finite() {
        return Err(Error::InvalidInput(format!(
            "holding period return needs a positive initial price, got {}",
            initial
        )));
    }
    Ok((last - initial) / initial)
}
