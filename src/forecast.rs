//! Short-horizon extrapolation of a period series: the mean of the trailing
//! window plus its average per-period change.

use crate::error::AnalysisError;
use crate::types::{ForecastSeries, PeriodSeries};
use tracing::debug;

/// Number of future periods appended.
pub const FORECAST_HORIZON: usize = 3;

/// Trailing history used for both the baseline and the trend.
pub const TREND_WINDOW: usize = 3;

/// Smallest meaningful bullwhip ratio: orders vary exactly as much as demand.
pub const RATIO_FLOOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastKind {
    /// Plain quantity (lead time in days); forecast values are not bounded.
    Level,
    /// Bullwhip-style ratio; forecast values never drop below `RATIO_FLOOR`.
    Ratio,
}

pub fn forecast(series: &PeriodSeries, kind: ForecastKind) -> Result<ForecastSeries, AnalysisError> {
    let values = series.values();
    let last_period = match series.last_period() {
        Some(p) if values.len() >= TREND_WINDOW => p,
        _ => {
            return Err(AnalysisError::InsufficientHistory {
                needed: TREND_WINDOW,
                available: values.len(),
            })
        }
    };

    let window = &values[values.len() - TREND_WINDOW..];
    let baseline = window.iter().sum::<f64>() / TREND_WINDOW as f64;
    let trend = (window[TREND_WINDOW - 1] - window[0]) / TREND_WINDOW as f64;

    let mut labels = series.labels();
    let mut historical: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    let mut projected: Vec<Option<f64>> = vec![None; values.len()];

    let mut period = last_period;
    for step in 1..=FORECAST_HORIZON {
        period = period.next();
        let mut value = baseline + trend * step as f64;
        if kind == ForecastKind::Ratio {
            value = value.max(RATIO_FLOOR);
        }
        labels.push(period.label());
        historical.push(None);
        projected.push(Some(value));
    }

    debug!(history = values.len(), baseline, trend, "forecast extrapolated");
    Ok(ForecastSeries {
        labels,
        historical,
        forecast: projected,
    })
}
