//! Risk analytics over price and return series.
//!
//! Provides log returns, volatility, parametric VaR, correlation, rolling
//! volatility and drawdown. Every function is pure: it reads an immutable
//! series and returns a new one.

mod drawdown;
mod performance;
mod returns;
mod risk;
mod rolling;

pub use drawdown::{compute_drawdown, max_drawdown};
pub use performance::{holding_period_return, normalize_prices};
pub use returns::compute_returns;
pub use risk::{
    annualized_volatility, compute_risk_metrics, correlation_matrix, mean, norm_ppf,
    parametric_var, pearson_correlation, sample_std, DEFAULT_CONFIDENCE, TRADING_DAYS_PER_YEAR,
};
pub use rolling::{compute_rolling_volatility, DEFAULT_WINDOW};
