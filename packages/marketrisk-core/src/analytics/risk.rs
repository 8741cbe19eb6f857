//! Volatility, parametric VaR and correlation.

use crate::series::ReturnSeries;
use crate::types::{CorrelationMatrix, RiskSummary, SymbolRisk};
use crate::{Error, Result};

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Confidence level used when none is configured.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Calculate volatility, VaR and correlation for every symbol in `returns`.
///
/// # Arguments
///
/// * `returns` - Daily log returns, one column per symbol
/// * `confidence` - Confidence level for VaR, strictly between 0 and 1 (typically 0.95)
///
/// # Returns
///
/// A [`RiskSummary`] with per-symbol annualized volatility and daily VaR,
/// plus the Pearson correlation matrix of the return columns.
///
/// A column with zero variance is not an error: its volatility is 0 and its
/// VaR reduces to the negated mean return.
pub fn compute_risk_metrics(returns: &ReturnSeries, confidence: f64) -> Result<RiskSummary> {
    validate_confidence(confidence)?;

    if returns.is_empty() {
        return Err(Error::InvalidInput(
            "returns are empty; at least one row is required".to_string(),
        ));
    }

    if returns.width() == 0 {
        return Err(Error::InvalidInput("returns have no symbol columns".to_string()));
    }

    let z_score = norm_ppf(1.0 - confidence);

    let symbols = returns
        .columns()
        .map(|(symbol, column)| {
            let mean_return = mean(column);
            let std_return = sample_std(column);
            SymbolRisk {
                symbol: symbol.to_string(),
                annualized_volatility: std_return * TRADING_DAYS_PER_YEAR.sqrt(),
                value_at_risk: -(mean_return + z_score * std_return),
                mean_return,
                std_return,
            }
        })
        .collect();

    Ok(RiskSummary {
        confidence_level: confidence,
        symbols,
        correlation: correlation_matrix(returns),
    })
}

/// Pearson correlation matrix of all return columns.
///
/// The diagonal is exactly 1.0. Off-diagonal entries are clamped to
/// `[-1, 1]`, and are NaN when either column has zero variance.
pub fn correlation_matrix(returns: &ReturnSeries) -> CorrelationMatrix {
    let columns: Vec<&[f64]> = returns.columns().map(|(_, column)| column).collect();
    let n = columns.len();
    let mut values = vec![vec![1.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let rho = pearson_correlation(columns[i], columns[j]);
            values[i][j] = rho;
            values[j][i] = rho;
        }
    }

    CorrelationMatrix {
        symbols: returns.symbols().to_vec(),
        values,
    }
}

/// Pearson correlation of two equally long series.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }

    (cov / denom).clamp(-1.0, 1.0)
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 divisor). NaN for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualized volatility of daily returns.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Daily parametric VaR as a fraction of position value.
///
/// `VaR = -(mean + z * std)` where `z` is the standard normal quantile at
/// `1 - confidence`.
pub fn parametric_var(returns: &[f64], confidence: f64) -> Result<f64> {
    validate_confidence(confidence)?;
    let z = norm_ppf(1.0 - confidence);
    Ok(-(mean(returns) + z * sample_std(returns)))
}

fn validate_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::InvalidInput(format!(
            "confidence must be between 0 and 1 (exclusive), got {}",
            confidence
        )));
    }
    Ok(())
}

/// Inverse cumulative distribution function for standard normal distribution.
///
/// Uses Acklam's algorithm for high accuracy across the full range.
/// Source: https://web.archive.org/web/20151110174102/http://home.online.no/~pjacklam/notes/invnorm/
pub fn norm_ppf(p: f64) -> f64 {
    // Coefficients in rational approximations
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];

    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];

    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];

    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    // Break-points between the tail and central regions
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    // Handle edge cases
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        // Rational approximation for lower region
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        // Rational approximation for central region
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        // Rational approximation for upper region
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Frame;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn returns(columns: Vec<(&str, Vec<f64>)>) -> ReturnSeries {
        let rows = columns[0].1.len();
        let dates = (0..rows)
            .map(|i| NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Days::new(i as u64))
            .collect();
        let (symbols, values): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(s, v)| (s.to_string(), v))
            .unzip();
        Frame::new(dates, symbols, values).unwrap()
    }

    #[test]
    fn test_norm_ppf() {
        assert!((norm_ppf(0.5)).abs() < 1e-9);
        assert!((norm_ppf(0.95) - 1.6448536269514722).abs() < 1e-8);
        assert!((norm_ppf(0.975) - 1.959963984540054).abs() < 1e-8);
        assert!((norm_ppf(0.99) - 2.3263478740408408).abs() < 1e-8);

        // Symmetry
        assert!((norm_ppf(0.05) + 1.6448536269514722).abs() < 1e-8);
        assert!((norm_ppf(0.001) + 3.090232306167813).abs() < 1e-7);
    }

    #[test]
    fn test_norm_ppf_bounds() {
        assert_eq!(norm_ppf(0.0), f64::NEG_INFINITY);
        assert_eq!(norm_ppf(1.0), f64::INFINITY);
    }

    #[test]
    fn test_two_day_scenario() {
        // prices 100 -> 105 -> 100.8
        let r = returns(vec![(
            "ACME",
            vec![0.04879016416943205, -0.040821994520255166],
        )]);

        let summary = compute_risk_metrics(&r, DEFAULT_CONFIDENCE).unwrap();
        let acme = summary.get("ACME").unwrap();

        assert_abs_diff_eq!(acme.mean_return, 0.0039840848245884415, epsilon = 1e-12);
        assert_abs_diff_eq!(acme.std_return, 0.06336536508624283, epsilon = 1e-12);
        assert_abs_diff_eq!(acme.annualized_volatility, 1.0058939865180805, epsilon = 1e-9);
        assert_abs_diff_eq!(acme.value_at_risk, 0.10024266576062225, epsilon = 1e-8);
        assert_eq!(summary.confidence_level, 0.95);
    }

    #[test]
    fn test_identical_series_fully_correlated() {
        let series = vec![0.01, -0.02, 0.015, 0.003, -0.007];
        let r = returns(vec![("A", series.clone()), ("B", series)]);

        let summary = compute_risk_metrics(&r, 0.95).unwrap();
        assert_eq!(summary.correlation.values, vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
    }

    #[test]
    fn test_correlation_matrix_symmetry() {
        let r = returns(vec![
            ("A", vec![0.01, -0.02, 0.015, 0.003]),
            ("B", vec![0.021, -0.039, 0.031, 0.007]),
            ("C", vec![-0.01, 0.02, -0.015, -0.003]),
        ]);

        let corr = correlation_matrix(&r);
        for i in 0..3 {
            assert_eq!(corr.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(corr.values[i][j], corr.values[j][i]);
                assert!(corr.values[i][j] >= -1.0 && corr.values[i][j] <= 1.0);
            }
        }
        assert_abs_diff_eq!(corr.get("A", "C").unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_is_not_an_error() {
        let r = returns(vec![
            ("FLAT", vec![0.25, 0.25, 0.25]),
            ("MOVE", vec![0.01, -0.01, 0.02]),
        ]);

        let summary = compute_risk_metrics(&r, 0.95).unwrap();
        let flat = summary.get("FLAT").unwrap();

        assert_eq!(flat.annualized_volatility, 0.0);
        assert_eq!(flat.value_at_risk, -0.25);
        assert_eq!(summary.correlation.get("FLAT", "FLAT"), Some(1.0));
        assert!(summary.correlation.get("FLAT", "MOVE").unwrap().is_nan());
    }

    #[test]
    fn test_single_row_gives_undefined_std() {
        let r = returns(vec![("A", vec![0.01])]);
        let summary = compute_risk_metrics(&r, 0.95).unwrap();
        assert!(summary.get("A").unwrap().annualized_volatility.is_nan());
    }

    #[test]
    fn test_rejects_bad_confidence() {
        let r = returns(vec![("A", vec![0.01, 0.02])]);
        for confidence in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                compute_risk_metrics(&r, confidence),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_rejects_empty_returns() {
        let r = Frame::empty(vec!["A".to_string()]);
        assert!(matches!(compute_risk_metrics(&r, 0.95), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_higher_confidence_raises_var() {
        let series = [0.01, -0.01, 0.02, -0.02, 0.01, -0.01, 0.015, -0.015, 0.005, -0.005];

        let var_95 = parametric_var(&series, 0.95).unwrap();
        let var_99 = parametric_var(&series, 0.99).unwrap();

        assert!(var_95 > 0.0);
        assert!(var_99 > var_95);
    }

    #[test]
    fn test_volatility() {
        let series = [0.01, -0.01, 0.02, -0.02, 0.01, -0.01, 0.015, -0.015, 0.005, -0.005];

        let vol = annualized_volatility(&series);

        // Roughly 1.4% daily, about 22% a year
        assert!(vol > 0.15);
        assert!(vol < 0.30);
    }
}
