//! End-to-end analysis run.

use crate::analytics::{
    compute_drawdown, compute_returns, compute_risk_metrics, compute_rolling_volatility,
    holding_period_return, max_drawdown, normalize_prices,
};
use crate::config::AnalysisConfig;
use crate::provider::PriceProvider;
use crate::series::{DrawdownSeries, Frame, PriceSeries, ReturnSeries, RollingVolatilitySeries};
use crate::types::RiskSummary;
use crate::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything a presentation layer needs to display one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Analyzed symbols, in column order
    pub symbols: Vec<String>,
    /// First requested date
    pub start: NaiveDate,
    /// End of the requested period (exclusive)
    pub end: NaiveDate,
    /// Rolling volatility window
    pub window: usize,
    /// Aligned closing prices
    pub prices: PriceSeries,
    /// Prices rebased to 100 at the first date
    pub normalized_prices: Frame,
    /// Daily log returns
    pub returns: ReturnSeries,
    /// Volatility, VaR and correlation
    pub risk: RiskSummary,
    /// Trailing-window annualized volatility
    pub rolling_volatility: RollingVolatilitySeries,
    /// Drawdown from the running peak
    pub drawdown: DrawdownSeries,
    /// Deepest drawdown per symbol
    pub max_drawdown: Vec<(String, f64)>,
    /// Simple return from first to last price per symbol
    pub period_return: Vec<(String, f64)>,
}

/// Fetch prices for `config` and derive every risk indicator from them.
///
/// The configuration is validated before anything is fetched. Any failure
/// aborts the run; no partial report is produced.
pub fn analyze<P: PriceProvider>(config: &AnalysisConfig, provider: &P) -> Result<AnalysisReport> {
    config.validate()?;

    let prices = provider.fetch(&config.symbols, config.start, config.end)?;
    tracing::debug!(rows = prices.len(), symbols = prices.width(), "fetched prices");

    let returns = compute_returns(&prices)?;
    tracing::debug!(rows = returns.len(), "computed log returns");

    let risk = compute_risk_metrics(&returns, config.confidence)?;
    let rolling_volatility = compute_rolling_volatility(&returns, config.window)?;
    tracing::debug!(
        rows = rolling_volatility.len(),
        window = config.window,
        "computed rolling volatility"
    );

    let drawdown = compute_drawdown(&returns);
    let max_drawdown = max_drawdown(&drawdown);
    let normalized_prices = normalize_prices(&prices)?;
    let period_return = prices
        .columns()
        .map(|(symbol, column)| {
            let last = column[column.len() - 1];
            Ok((symbol.to_string(), holding_period_return(column[0], last)?))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        symbols = %config.symbols.join(","),
        start = %config.start,
        end = %config.end,
        days = prices.len(),
        "risk analysis complete"
    );

    Ok(AnalysisReport {
        symbols: prices.symbols().to_vec(),
        start: config.start,
        end: config.end,
        window: config.window,
        prices,
        normalized_prices,
        returns,
        risk,
        rolling_volatility,
        drawdown,
        max_drawdown,
        period_return,
    })
}
