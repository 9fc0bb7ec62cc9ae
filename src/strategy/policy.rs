// src/strategy/policy.rs

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::echelon::Observation;
use crate::simulation::cost::CostRates;
use crate::strategy::forecast::{DemandEstimator, ForecastMethod, DEFAULT_WINDOW};
use crate::strategy::optimization::optimal_base_stock;

fn default_window() -> usize {
    DEFAULT_WINDOW
}

fn default_min_history() -> usize {
    DEFAULT_WINDOW
}

/// How a fractional order quantity becomes an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    #[default]
    Round,
    Floor,
}

/// The interchangeable ordering strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    /// Orders exactly what was demanded last turn.
    PassThrough,

    /// Orders the moving average of recent demand.
    MovingAverage {
        #[serde(default = "default_window")]
        window: usize,
    },

    /// Orders a smoothed estimate of the latest demand plus the detected trend slope
    /// once `min_history` observations exist. Until then it orders the last demand
    /// plus `default_increment`.
    TrendFollowing {
        #[serde(default = "default_window")]
        window: usize,
        #[serde(default = "default_min_history")]
        min_history: usize,
        #[serde(default)]
        default_increment: i64,
    },

    /// Projects stock over the full replenishment round trip and orders a fixed batch
    /// whenever the projection reaches `stock_threshold`.
    OrderUpTo {
        stock_threshold: i64,
        amount_to_buy: u32,
        #[serde(default)]
        forecast: ForecastMethod,
    },

    /// Orders forecast demand plus the gap between `target` and the inventory
    /// position (stock plus everything in transit).
    BaseStock {
        target: i64,
        #[serde(default)]
        forecast: ForecastMethod,
    },

    /// Orders `schedule[turn]`, then `fallback` once the schedule runs out.
    FixedSchedule {
        schedule: Vec<u32>,
        #[serde(default)]
        fallback: u32,
    },

    /// Uniform draw in `[min, max]` from the caller's generator.
    Random { min: u32, max: u32 },
}

/// A strategy plus the rounding applied to its raw output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPolicy {
    #[serde(flatten)]
    pub strategy: Strategy,
    #[serde(default)]
    pub rounding: Rounding,
}

impl From<Strategy> for ReplenishmentPolicy {
    fn from(strategy: Strategy) -> Self {
        Self {
            strategy,
            rounding: Rounding::default(),
        }
    }
}

impl ReplenishmentPolicy {
    pub fn new(strategy: Strategy) -> Self {
        strategy.into()
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn order_up_to(stock_threshold: i64, amount_to_buy: u32) -> Self {
        Strategy::OrderUpTo {
            stock_threshold,
            amount_to_buy,
            forecast: ForecastMethod::default(),
        }
        .into()
    }

    pub fn trend_following(window: usize, min_history: usize) -> Self {
        Strategy::TrendFollowing {
            window,
            min_history,
            default_increment: 0,
        }
        .into()
    }

    /// A base-stock policy whose target comes from the newsvendor critical ratio.
    ///
    /// `round_trip` is the order lead time plus the shipment lead time of the link.
    pub fn base_stock_for(
        rates: &CostRates,
        mean_demand: f64,
        std_dev_demand: f64,
        round_trip: usize,
    ) -> Self {
        Strategy::BaseStock {
            target: optimal_base_stock(rates, mean_demand, std_dev_demand, round_trip),
            forecast: ForecastMethod::default(),
        }
        .into()
    }

    /// Decides this turn's order from the agent's own observation and history.
    ///
    /// Never fails: negative or non-finite raw quantities become 0.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        obs: &Observation,
        estimator: &DemandEstimator,
        rng: &mut R,
    ) -> u32 {
        let raw = match &self.strategy {
            Strategy::PassThrough => obs.next_incoming_order as f64,
            Strategy::MovingAverage { window } => estimator.moving_average(*window),
            Strategy::TrendFollowing {
                window,
                min_history,
                default_increment,
            } => {
                if estimator.len() < *min_history {
                    estimator.last_value() + *default_increment as f64
                } else {
                    estimator.slope_adjusted_level(*window)
                }
            }
            Strategy::OrderUpTo {
                stock_threshold,
                amount_to_buy,
                forecast,
            } => {
                let projected = projected_stock(obs, estimator.forecast(*forecast));
                if projected <= *stock_threshold as f64 {
                    *amount_to_buy as f64
                } else {
                    0.0
                }
            }
            Strategy::BaseStock { target, forecast } => {
                estimator.forecast(*forecast) + *target as f64 - inventory_position(obs)
            }
            Strategy::FixedSchedule { schedule, fallback } => {
                schedule.get(obs.turn as usize).copied().unwrap_or(*fallback) as f64
            }
            Strategy::Random { min, max } => {
                let (lo, hi) = if min <= max { (*min, *max) } else { (*max, *min) };
                rng.gen_range(lo..=hi) as f64
            }
        };

        if !raw.is_finite() || raw < 0.0 {
            warn!(
                "{} policy produced invalid order {:.2} at turn {}; clamped to 0",
                obs.role, raw, obs.turn
            );
        }
        clamp_order(raw, self.rounding)
    }
}

/// Stock plus everything already in transit toward this echelon.
pub fn inventory_position(obs: &Observation) -> f64 {
    let in_transit: u64 = obs
        .inbound_shipments
        .iter()
        .chain(obs.orders.iter())
        .map(|&q| q as u64)
        .sum();
    obs.current_stock as f64 + in_transit as f64
}

/// Stock expected at the end of the replenishment round trip.
///
/// The horizon is order lead time + shipment lead time + one review turn. Every
/// shipment and pending order arrives within it, and `forecast` is consumed each turn.
pub fn projected_stock(obs: &Observation, forecast: f64) -> f64 {
    let horizon = (obs.orders.len() + obs.inbound_shipments.len() + 1) as f64;
    inventory_position(obs) - horizon * forecast
}

/// Converts a raw quantity into a valid order: non-finite or negative becomes 0.
pub fn clamp_order(raw: f64, rounding: Rounding) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let whole = match rounding {
        Rounding::Round => raw.round(),
        Rounding::Floor => raw.floor(),
    };
    if whole >= u32::MAX as f64 {
        u32::MAX
    } else {
        whole as u32
    }
}
