//! Rolling (trailing window) volatility.

use super::risk::{sample_std, TRADING_DAYS_PER_YEAR};
use crate::series::{Frame, ReturnSeries, RollingVolatilitySeries};
use crate::{Error, Result};

/// Window length used when none is configured (about one trading month).
pub const DEFAULT_WINDOW: usize = 21;

/// Calculate annualized volatility over a trailing window.
///
/// # Arguments
///
/// * `returns` - Daily log returns, one column per symbol
/// * `window` - Number of trailing observations per value (at least 2)
///
/// # Returns
///
/// One row per date that has `window` observations up to and including it,
/// i.e. `max(0, returns.len() - window + 1)` rows. Each value is the sample
/// standard deviation of the window scaled by `sqrt(252)`. Too little
/// history yields an empty series rather than an error.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use marketrisk_core::{compute_rolling_volatility, Frame};
///
/// let dates = (1..=5)
///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
///     .collect();
/// let returns = Frame::new(
///     dates,
///     vec!["ACME".into()],
///     vec![vec![0.01, -0.02, 0.015, 0.0, -0.005]],
/// )
/// .unwrap();
///
/// let rolling = compute_rolling_volatility(&returns, 3).unwrap();
/// assert_eq!(rolling.len(), 3);
/// ```
pub fn compute_rolling_volatility(
    returns: &ReturnSeries,
    window: usize,
) -> Result<RollingVolatilitySeries> {
    if window < 2 {
        return Err(Error::InvalidInput(format!(
            "rolling window must be at least 2, got {}",
            window
        )));
    }

    if returns.len() < window {
        tracing::debug!(
            rows = returns.len(),
            window,
            "not enough history for rolling volatility"
        );
        return Ok(Frame::empty(returns.symbols().to_vec()));
    }

    let annualization = TRADING_DAYS_PER_YEAR.sqrt();
    let columns = returns
        .columns()
        .map(|(_, column)| {
            column
                .windows(window)
                .map(|w| sample_std(w) * annualization)
                .collect()
        })
        .collect();

    Ok(Frame::from_parts(
        returns.dates()[window - 1..].to_vec(),
        returns.symbols().to_vec(),
        columns,
    ))
}
