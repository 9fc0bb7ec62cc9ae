// src/io/demand.rs

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Exogenous customer demand seen by the Retailer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum DemandPattern {
    /// 4 units for the first four turns, then 8: the classic bullwhip trigger.
    #[default]
    Classical,
    Constant {
        value: u32,
    },
    /// `before` until `at_turn`, `after` from then on.
    Step {
        before: u32,
        after: u32,
        at_turn: usize,
    },
    /// Uniform integers in `[low, high]`.
    Uniform {
        low: u32,
        high: u32,
    },
    /// Normal draws rounded to the nearest integer, negatives clamped to 0.
    Normal {
        mean: f64,
        std_dev: f64,
    },
}

impl DemandPattern {
    /// Rejects parameters no distribution can be built from.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            DemandPattern::Uniform { low, high } if low > high => Err(SimError::InvalidConfig(
                format!("uniform demand needs low <= high, got {low} > {high}"),
            )),
            // `Normal::new` accepts a negative std_dev and mirrors the distribution
            DemandPattern::Normal { mean, std_dev }
                if !mean.is_finite() || !std_dev.is_finite() || *std_dev < 0.0 =>
            {
                Err(SimError::InvalidConfig(format!(
                    "normal demand needs a finite mean and std_dev >= 0, got N({mean}, {std_dev})"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Expands the pattern into one demand value per turn.
    pub fn generate<R: Rng + ?Sized>(&self, turns: usize, rng: &mut R) -> SimResult<Vec<u32>> {
        self.validate()?;
        let schedule: Vec<u32> = match self {
            DemandPattern::Classical => (0..turns).map(|t| if t < 4 { 4 } else { 8 }).collect(),
            DemandPattern::Constant { value } => vec![*value; turns],
            DemandPattern::Step {
                before,
                after,
                at_turn,
            } => (0..turns)
                .map(|t| if t < *at_turn { *before } else { *after })
                .collect(),
            DemandPattern::Uniform { low, high } => {
                (0..turns).map(|_| rng.gen_range(*low..=*high)).collect()
            }
            DemandPattern::Normal { mean, std_dev } => {
                let normal = Normal::new(*mean, *std_dev).map_err(|e| {
                    SimError::InvalidConfig(format!("normal demand N({mean}, {std_dev}): {e}"))
                })?;
                (0..turns)
                    .map(|_| {
                        let val: f64 = normal.sample(rng).round();
                        if val < 0.0 {
                            0
                        } else {
                            val as u32
                        }
                    })
                    .collect()
            }
        };
        Ok(schedule)
    }
}
