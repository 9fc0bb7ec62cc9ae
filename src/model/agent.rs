use rand_pcg::Pcg64Mcg;

use crate::model::echelon::{Observation, Role};
use crate::strategy::forecast::DemandEstimator;
use crate::strategy::policy::ReplenishmentPolicy;

/// The decision-maker for one echelon.
///
/// Owns its demand history and random stream outright, so nothing it learns in one
/// game can leak into another agent or another run.
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: Role,
    policy: ReplenishmentPolicy,
    estimator: DemandEstimator,
    rng: Pcg64Mcg,
    // Starting estimator and stream, restored by `reset`
    initial_estimator: DemandEstimator,
    initial_rng: Pcg64Mcg,
    pub last_order_placed: u32,
}

impl Agent {
    pub fn new(role: Role, policy: ReplenishmentPolicy, rng: Pcg64Mcg) -> Self {
        Self {
            role,
            policy,
            estimator: DemandEstimator::new(),
            initial_estimator: DemandEstimator::new(),
            initial_rng: rng.clone(),
            rng,
            last_order_placed: 0,
        }
    }

    pub fn with_estimator(mut self, estimator: DemandEstimator) -> Self {
        self.initial_estimator = estimator.clone();
        self.estimator = estimator;
        self
    }

    /// Forgets everything learned since construction and rewinds the random stream.
    pub fn reset(&mut self) {
        self.estimator = self.initial_estimator.clone();
        self.rng = self.initial_rng.clone();
        self.last_order_placed = 0;
    }

    pub fn policy(&self) -> &ReplenishmentPolicy {
        &self.policy
    }

    pub fn estimator(&self) -> &DemandEstimator {
        &self.estimator
    }

    /// Records the demand just observed, then asks the policy for an order.
    pub fn decide(&mut self, obs: &Observation) -> u32 {
        self.estimator.record(obs.next_incoming_order);
        let order = self.policy.decide(obs, &self.estimator, &mut self.rng);
        self.last_order_placed = order;
        order
    }
}
