//! Market Risk Core - Risk analytics for sets of price series.
//!
//! This crate turns closing prices into market-risk indicators:
//!
//! - **Returns**: daily log returns on complete-case aligned dates
//! - **Risk metrics**: annualized volatility, parametric VaR, correlation
//! - **Rolling volatility**: trailing-window annualized volatility
//! - **Drawdown**: decline from the running peak of cumulative returns
//! - **Providers**: price retrieval boundary with a memoizing decorator
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use marketrisk_core::{analyze, AnalysisConfig, JsonFileProvider};
//!
//! let provider = JsonFileProvider::from_json(
//!     r#"{ "ACME": { "2024-01-02": 100.0, "2024-01-03": 105.0, "2024-01-04": 100.8 } }"#,
//! )
//! .unwrap();
//!
//! let config = AnalysisConfig {
//!     symbols: vec!["ACME".to_string()],
//!     start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//!     confidence: 0.95,
//!     window: 2,
//! };
//!
//! let report = analyze(&config, &provider).unwrap();
//! let var = report.risk.value_at_risk("ACME").unwrap();
//! println!("Daily VaR 95%: {:.2}%", var * 100.0);
//! ```

pub mod analytics;
pub mod config;
pub mod provider;
pub mod report;
pub mod series;
pub mod types;

// Re-export commonly used types
pub use config::{parse_symbols, AnalysisConfig, DEFAULT_SYMBOLS};
pub use provider::{CachedProvider, JsonFileProvider, PriceProvider};
pub use report::{analyze, AnalysisReport};
pub use series::{DrawdownSeries, Frame, PriceSeries, ReturnSeries, RollingVolatilitySeries};
pub use types::{ApiResponse, CorrelationMatrix, RiskSummary, SymbolRisk};

// Re-export main functionality
pub use analytics::{
    compute_drawdown, compute_returns, compute_risk_metrics, compute_rolling_volatility,
    max_drawdown, normalize_prices, norm_ppf, DEFAULT_CONFIDENCE, DEFAULT_WINDOW,
    TRADING_DAYS_PER_YEAR,
};

/// Error types for marketrisk-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("No data: {0}")]
    EmptyResult(String),
}

/// Result type for marketrisk-core operations.
pub type Result<T> = std::result::Result<T, Error>;
