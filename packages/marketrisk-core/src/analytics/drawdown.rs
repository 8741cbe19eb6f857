//! Drawdown from the running peak of cumulative returns.

use crate::series::{DrawdownSeries, Frame, ReturnSeries};

/// Calculate the drawdown series for every symbol.
///
/// The cumulative index compounds `1 + r` over the returns. The running peak
/// is the highest cumulative value on or before each date, so the first date
/// is always its own peak. Each value is `(cumulative - peak) / peak`: never
/// positive, and exactly 0 whenever the index sets a new peak.
///
/// The result has the same dates and symbols as `returns`.
pub fn compute_drawdown(returns: &ReturnSeries) -> DrawdownSeries {
    let columns = returns
        .columns()
        .map(|(_, column)| {
            let mut cumulative = 1.0;
            let mut peak = f64::NEG_INFINITY;
            column
                .iter()
                .map(|r| {
                    cumulative *= 1.0 + r;
                    peak = peak.max(cumulative);
                    (cumulative - peak) / peak
                })
                .collect()
        })
        .collect();

    Frame::from_parts(
        returns.dates().to_vec(),
        returns.symbols().to_vec(),
        columns,
    )
}

/// Deepest drawdown per symbol, as a non-positive fraction.
///
/// Returns 0.0 for symbols of an empty series.
pub fn max_drawdown(drawdown: &DrawdownSeries) -> Vec<(String, f64)> {
    drawdown
        .columns()
        .map(|(symbol, column)| {
            let deepest = column.iter().copied().fold(0.0, f64::min);
            (symbol.to_string(), deepest)
        })
        .collect()
}
