// src/strategy/forecast.rs

//! Demand forecasting over an agent's own order history.
//!
//! Every forecast falls back gracefully when history is short: a window larger than
//! the history shrinks to the whole history, and an empty history yields the
//! configured default forecast.

use serde::{Deserialize, Serialize};

/// Number of trailing observations in the short median used to damp trend noise.
pub const SHORT_MEDIAN_WINDOW: usize = 3;

pub const DEFAULT_WINDOW: usize = 4;

fn default_window() -> usize {
    DEFAULT_WINDOW
}

/// Which forecast a policy asks the estimator for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ForecastMethod {
    LastValue,
    MovingAverage {
        #[serde(default = "default_window")]
        window: usize,
    },
    Trend {
        #[serde(default = "default_window")]
        window: usize,
    },
}

impl Default for ForecastMethod {
    fn default() -> Self {
        ForecastMethod::MovingAverage {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Append-only history of the demand one echelon has observed, one entry per turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandEstimator {
    history: Vec<u32>,
    default_forecast: f64,
    skip_zero_observations: bool,
}

impl DemandEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forecast returned while no demand has been observed yet.
    pub fn with_default_forecast(mut self, default_forecast: f64) -> Self {
        self.default_forecast = default_forecast;
        self
    }

    /// Legacy behaviour that drops zero observations. This breaks the alignment
    /// between history positions and turns, so it is opt-in only.
    pub fn skipping_zero_observations(mut self, skip: bool) -> Self {
        self.skip_zero_observations = skip;
        self
    }

    pub fn record(&mut self, demand: u32) {
        if self.skip_zero_observations && demand == 0 {
            return;
        }
        self.history.push(demand);
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The last `window` entries, or the whole history if shorter. A zero window is
    /// treated as one.
    fn tail(&self, window: usize) -> &[u32] {
        let n = window.max(1).min(self.history.len());
        &self.history[self.history.len() - n..]
    }

    pub fn last_value(&self) -> f64 {
        self.history
            .last()
            .map(|&d| d as f64)
            .unwrap_or(self.default_forecast)
    }

    pub fn moving_average(&self, window: usize) -> f64 {
        let tail = self.tail(window);
        if tail.is_empty() {
            return self.default_forecast;
        }
        tail.iter().map(|&d| d as f64).sum::<f64>() / tail.len() as f64
    }

    pub fn median(&self, window: usize) -> f64 {
        let tail = self.tail(window);
        if tail.is_empty() {
            return self.default_forecast;
        }
        let mut sorted: Vec<f64> = tail.iter().map(|&d| d as f64).collect();
        median_of(&mut sorted)
    }

    /// Least-squares fit over the last `window` entries, as `(slope, intercept)` with x
    /// running `0..n`. `None` with fewer than two samples.
    fn least_squares(&self, window: usize) -> Option<(f64, f64)> {
        let tail = self.tail(window);
        let n = tail.len();
        if n < 2 {
            return None;
        }
        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = tail.iter().map(|&d| d as f64).sum::<f64>() / n_f;

        let mut cov = 0.0;
        let mut var = 0.0;
        for (x, &y) in tail.iter().enumerate() {
            let dx = x as f64 - mean_x;
            cov += dx * (y as f64 - mean_y);
            var += dx * dx;
        }
        let slope = cov / var;
        Some((slope, mean_y - slope * mean_x))
    }

    /// Slope of the least-squares line, 0 with fewer than two samples.
    pub fn trend_slope(&self, window: usize) -> f64 {
        self.least_squares(window)
            .map(|(slope, _)| slope)
            .unwrap_or(0.0)
    }

    /// One-step-ahead linear projection, median-filtered against the short-window
    /// median and the latest observation.
    pub fn trend_extrapolation(&self, window: usize) -> f64 {
        let Some((slope, intercept)) = self.least_squares(window) else {
            return self.last_value();
        };
        let n = self.tail(window).len() as f64;
        let projection = intercept + slope * n;

        let mut candidates = [
            projection,
            self.median(SHORT_MEDIAN_WINDOW),
            self.last_value(),
        ];
        median_of(&mut candidates)
    }

    /// Most recent demand plus the detected trend, smoothed.
    ///
    /// Each of the last three observations is carried forward to the next turn along
    /// `trend_slope(window)` and the median of those projections is returned, so a
    /// single outlier cannot swing the estimate.
    pub fn slope_adjusted_level(&self, window: usize) -> f64 {
        let recent = self.tail(SHORT_MEDIAN_WINDOW);
        if recent.is_empty() {
            return self.default_forecast;
        }
        let slope = self.trend_slope(window);
        let mut projections: Vec<f64> = recent
            .iter()
            .rev()
            .enumerate()
            .map(|(lag, &d)| d as f64 + (lag + 1) as f64 * slope)
            .collect();
        median_of(&mut projections)
    }

    pub fn forecast(&self, method: ForecastMethod) -> f64 {
        match method {
            ForecastMethod::LastValue => self.last_value(),
            ForecastMethod::MovingAverage { window } => self.moving_average(window),
            ForecastMethod::Trend { window } => self.trend_extrapolation(window),
        }
    }
}

fn median_of(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
