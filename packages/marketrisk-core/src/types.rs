//! Result types for risk analysis.

use serde::{Deserialize, Serialize};

/// Risk figures for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolRisk {
    /// Ticker symbol
    pub symbol: String,
    /// Sample standard deviation of daily returns scaled by sqrt(252)
    pub annualized_volatility: f64,
    /// Daily parametric VaR as a fraction of position value
    pub value_at_risk: f64,
    /// Mean daily return
    pub mean_return: f64,
    /// Sample standard deviation of daily returns
    pub std_return: f64,
}

/// Pearson correlation matrix over a set of symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationMatrix {
    /// Row and column labels
    pub symbols: Vec<String>,
    /// Row-major correlation values
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two symbols, if both are present.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }

    /// Number of symbols on each axis.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }
}

/// Volatility, VaR and correlation derived from one return series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSummary {
    /// Confidence level used for VaR (e.g. 0.95 for 95%)
    pub confidence_level: f64,
    /// Per-symbol figures, in return column order
    pub symbols: Vec<SymbolRisk>,
    /// Correlation between return columns
    pub correlation: CorrelationMatrix,
}

impl RiskSummary {
    /// Figures for one symbol.
    pub fn get(&self, symbol: &str) -> Option<&SymbolRisk> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }

    /// Annualized volatility for one symbol.
    pub fn volatility(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|s| s.annualized_volatility)
    }

    /// Daily VaR for one symbol.
    pub fn value_at_risk(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|s| s.value_at_risk)
    }
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RiskSummary {
        RiskSummary {
            confidence_level: 0.95,
            symbols: vec![
                SymbolRisk {
                    symbol: "PETR4.SA".to_string(),
                    annualized_volatility: 0.32,
                    value_at_risk: 0.031,
                    mean_return: 0.0004,
                    std_return: 0.02,
                },
                SymbolRisk {
                    symbol: "^BVSP".to_string(),
                    annualized_volatility: 0.18,
                    value_at_risk: 0.018,
                    mean_return: 0.0002,
                    std_return: 0.011,
                },
            ],
            correlation: CorrelationMatrix {
                symbols: vec!["PETR4.SA".to_string(), "^BVSP".to_string()],
                values: vec![vec![1.0, 0.7], vec![0.7, 1.0]],
            },
        }
    }

    #[test]
    fn test_summary_lookup() {
        let summary = summary();
        assert_eq!(summary.volatility("PETR4.SA"), Some(0.32));
        assert_eq!(summary.value_at_risk("^BVSP"), Some(0.018));
        assert!(summary.get("MGLU3.SA").is_none());
    }

    #[test]
    fn test_correlation_lookup() {
        let corr = summary().correlation;
        assert_eq!(corr.size(), 2);
        assert_eq!(corr.get("PETR4.SA", "^BVSP"), Some(0.7));
        assert_eq!(corr.get("^BVSP", "^BVSP"), Some(1.0));
        assert!(corr.get("PETR4.SA", "ITUB4.SA").is_none());
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
