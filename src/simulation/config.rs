// src/simulation/config.rs

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::io::demand::DemandPattern;
use crate::model::echelon::Role;
use crate::simulation::cost::CostRates;
use crate::strategy::policy::{ReplenishmentPolicy, Strategy};

/// Longest lead time a link may have; pipelines are allocated up front.
pub const MAX_LEAD_TIME: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of turns in one game.
    pub horizon: u32,
    /// Order and shipment lead time of each echelon's upstream link, retailer first.
    pub lead_times: [usize; 4],
    pub initial_stock: i64,
    /// Value every pipeline slot starts with.
    pub initial_order_rate: u32,
    pub holding_rate: f64,
    pub stockout_rate: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 20,
            lead_times: [2, 2, 2, 1],
            initial_stock: 12,
            initial_order_rate: 4,
            holding_rate: 0.5,
            stockout_rate: 1.0,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn cost_rates(&self) -> CostRates {
        CostRates {
            holding_rate: self.holding_rate,
            stockout_rate: self.stockout_rate,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.horizon == 0 {
            return Err(SimError::InvalidConfig("horizon must be at least one turn".into()));
        }
        if let Some(lead) = self.lead_times.iter().find(|&&l| l > MAX_LEAD_TIME) {
            return Err(SimError::InvalidConfig(format!(
                "lead time {lead} exceeds the maximum of {MAX_LEAD_TIME}"
            )));
        }
        let rates = [
            ("holding_rate", self.holding_rate),
            ("stockout_rate", self.stockout_rate),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// A complete game: chain parameters, customer demand and one policy per echelon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub demand: DemandPattern,
    /// Retailer, Wholesaler, Distributor, Manufacturer.
    pub agents: Vec<ReplenishmentPolicy>,
}

impl Default for GameConfig {
    /// Every echelon runs order-up-to: reorder 4 units once projected stock reaches 8.
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            demand: DemandPattern::default(),
            agents: vec![ReplenishmentPolicy::order_up_to(8, 4); 4],
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.simulation.validate()?;
        self.demand.validate()?;
        if self.agents.len() != 4 {
            return Err(SimError::InvalidConfig(format!(
                "exactly 4 agents are required, got {}",
                self.agents.len()
            )));
        }
        for (role, policy) in Role::ALL.iter().zip(&self.agents) {
            if let Strategy::Random { min, max } = policy.strategy {
                if min > max {
                    return Err(SimError::InvalidConfig(format!(
                        "{role}: random order range {min}..={max} is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}
