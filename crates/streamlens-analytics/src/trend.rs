//! Trend analysis over bucketed series
//!
//! Running averages, cumulative sums, and simple forecasting used by the
//! overview and revenue pages.

use serde::{Deserialize, Serialize};
use streamlens_common::{Result, StreamlensError};
use tracing::debug;

/// Forecasting strategies for future values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Least-squares straight line through the series
    Linear,
    /// Repeat the last running average
    MovingAverage,
}

/// Running average with the given window; the first `window - 1` positions
/// have no complete window and come back as `None`
pub fn running_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Cumulative sum of the series
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|v| {
            total += v;
            total
        })
        .collect()
}

/// Least-squares slope and intercept over positions 0..n
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }

    // A single point has no slope
    let slope = if denominator == 0.0 { 0.0 } else { numerator / denominator };
    (slope, mean_y - slope * mean_x)
}

/// Forecast the next `periods` values of a series.
///
/// Needs at least one observation; the moving-average method uses a window
/// of up to seven trailing values, mirroring the dashboard default.
pub fn forecast(values: &[f64], periods: usize, method: ForecastMethod) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(StreamlensError::invalid_input(
            "cannot forecast from an empty series",
        ));
    }

    let predictions = match method {
        ForecastMethod::Linear => {
            let (slope, intercept) = linear_fit(values);
            (0..periods)
                .map(|i| slope * (values.len() + i) as f64 + intercept)
                .collect()
        }
        ForecastMethod::MovingAverage => {
            let window = values.len().min(7);
            let tail = &values[values.len() - window..];
            let average = tail.iter().sum::<f64>() / window as f64;
            vec![average; periods]
        }
    };

    debug!(?method, periods, "forecast computed");
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamlens_common::test_utils::assert_approx_eq;

    #[test]
    fn test_running_average() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let averages = running_average(&values, 3);
        assert_eq!(averages[0], None);
        assert_eq!(averages[1], None);
        assert_approx_eq(averages[2].unwrap(), 2.0, 1e-9);
        assert_approx_eq(averages[4].unwrap(), 4.0, 1e-9);
    }

    #[test]
    fn test_running_average_degenerate_windows() {
        let values = [1.0, 2.0];
        assert_eq!(running_average(&values, 0), vec![None, None]);
        let identity = running_average(&values, 1);
        assert_approx_eq(identity[0].unwrap(), 1.0, 1e-9);
    }

    #[test]
    fn test_cumulative_sum() {
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn test_linear_forecast_extends_exact_line() {
        // y = 2x + 1
        let values: Vec<f64> = (0..5).map(|x| 2.0 * x as f64 + 1.0).collect();
        let predicted = forecast(&values, 2, ForecastMethod::Linear).unwrap();
        assert_approx_eq(predicted[0], 11.0, 1e-9);
        assert_approx_eq(predicted[1], 13.0, 1e-9);
    }

    #[test]
    fn test_moving_average_forecast_is_flat() {
        let values = [10.0, 20.0, 30.0];
        let predicted = forecast(&values, 3, ForecastMethod::MovingAverage).unwrap();
        for value in predicted {
            assert_approx_eq(value, 20.0, 1e-9);
        }
    }

    #[test]
    fn test_forecast_rejects_empty_series() {
        assert!(forecast(&[], 1, ForecastMethod::Linear).is_err());
    }

    #[test]
    fn test_single_point_forecast_is_constant() {
        let predicted = forecast(&[42.0], 2, ForecastMethod::Linear).unwrap();
        assert_approx_eq(predicted[0], 42.0, 1e-9);
        assert_approx_eq(predicted[1], 42.0, 1e-9);
    }
}
