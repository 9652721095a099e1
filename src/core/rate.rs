//! Exchange rate observations and the buying power derived from them

use crate::core::error::FxError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The most recent close of a currency's time series.
///
/// `rate` is quoted as foreign units per 1 USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyObservation {
    pub code: String,
    pub rate: f64,
    pub as_of: NaiveDate,
}

/// A rate together with the USD value of one foreign unit, as a percent of $1.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyMetric {
    pub code: String,
    pub rate: f64,
    pub percentage: f64,
}

impl CurrencyMetric {
    pub fn from_observation(observation: &CurrencyObservation) -> Result<Self, FxError> {
        Ok(CurrencyMetric {
            code: observation.code.clone(),
            rate: observation.rate,
            percentage: buying_power_percentage(observation.rate)?,
        })
    }

    /// USD received for one unit of the foreign currency.
    pub fn inverse_rate(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn is_overflow(&self) -> bool {
        self.percentage > 100.0
    }
}

/// Computes `(1 / rate) * 100`.
///
/// Rejects zero, negative and non-finite rates instead of producing
/// infinities or NaN.
pub fn buying_power_percentage(rate: f64) -> Result<f64, FxError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(FxError::InvalidRate(rate));
    }
    Ok((1.0 / rate) * 100.0)
}

/// Source of the latest observation for a currency.
pub trait ObservationProvider {
    fn latest(&self, code: &str, path: &Path) -> Result<CurrencyObservation, FxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(code: &str, rate: f64) -> CurrencyObservation {
        CurrencyObservation {
            code: code.to_string(),
            rate,
            as_of: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn test_percentage_is_hundred_over_rate() {
        for rate in [0.01, 0.85, 1.0, 5.0, 18.25, 150.0, 10_000.0] {
            let pct = buying_power_percentage(rate).unwrap();
            assert!((pct - 100.0 / rate).abs() < 1e-9, "rate {rate} gave {pct}");
            assert!(pct > 0.0);
        }
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        assert_eq!(buying_power_percentage(0.0), Err(FxError::InvalidRate(0.0)));
        assert_eq!(buying_power_percentage(-1.5), Err(FxError::InvalidRate(-1.5)));
        assert!(buying_power_percentage(f64::NAN).is_err());
        assert!(buying_power_percentage(f64::INFINITY).is_err());
    }

    #[test]
    fn test_metric_from_observation() {
        let metric = CurrencyMetric::from_observation(&observation("BRL", 5.0)).unwrap();
        assert_eq!(metric.code, "BRL");
        assert!((metric.percentage - 20.0).abs() < 1e-9);
        assert!((metric.inverse_rate() - 0.2).abs() < 1e-9);
        assert!(!metric.is_overflow());

        let eur = CurrencyMetric::from_observation(&observation("EUR", 0.85)).unwrap();
        assert!((eur.percentage - 117.647).abs() < 0.001);
        assert!(eur.is_overflow());
    }

    #[test]
    fn test_metric_rejects_zero_rate() {
        let err = CurrencyMetric::from_observation(&observation("JPY", 0.0)).unwrap_err();
        assert!(err.to_string().contains("Invalid rate"));
    }
}
