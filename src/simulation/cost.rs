// src/simulation/cost.rs

use serde::{Deserialize, Serialize};

/// Per-unit, per-turn cost rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    pub holding_rate: f64,
    pub stockout_rate: f64,
}

impl Default for CostRates {
    /// Standard Beer Game costs: 0.50 per unit held, 1.00 per unit backlogged.
    fn default() -> Self {
        Self {
            holding_rate: 0.5,
            stockout_rate: 1.0,
        }
    }
}

/// Cost charged to one echelon for one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TurnCost {
    pub holding: f64,
    pub stockout: f64,
}

impl TurnCost {
    pub fn total(&self) -> f64 {
        self.holding + self.stockout
    }
}

/// Turns a post-update stock level into holding and stockout cost.
///
/// Positive stock is charged at the holding rate, negative stock (backlog) at the
/// stockout rate. At most one of the two is nonzero.
pub fn assess(stock: i64, rates: &CostRates) -> TurnCost {
    let held = stock.max(0) as f64;
    let short = stock.min(0).unsigned_abs() as f64;
    TurnCost {
        holding: held * rates.holding_rate,
        stockout: short * rates.stockout_rate,
    }
}
