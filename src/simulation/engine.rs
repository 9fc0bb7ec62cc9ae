// src/simulation/engine.rs

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::echelon::{EchelonState, EchelonTurn, Observation, Role};
use crate::simulation::config::SimulationConfig;
use crate::simulation::cost::CostRates;

/// Columnar snapshot of the whole chain, one entry per echelon in each field.
///
/// This is the recorded history format consumed by the replay renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn: u32,
    pub stock_level: Vec<i64>,
    pub next_incoming_orders: Vec<u32>,
    pub holding_cost: Vec<f64>,
    pub cumulative_holding_cost: Vec<f64>,
    pub stockout_cost: Vec<f64>,
    pub cumulative_stockout_cost: Vec<f64>,
    pub orders_placed: Vec<Vec<u32>>,
    pub inbound_shipments: Vec<Vec<u32>>,
}

impl TurnSnapshot {
    fn capture(turn: u32, echelons: &[EchelonState]) -> Self {
        Self {
            turn,
            stock_level: echelons.iter().map(|e| e.stock).collect(),
            next_incoming_orders: echelons.iter().map(|e| e.last_incoming_demand).collect(),
            holding_cost: echelons.iter().map(|e| e.last_cost.holding).collect(),
            cumulative_holding_cost: echelons.iter().map(|e| e.cumulative_holding_cost).collect(),
            stockout_cost: echelons.iter().map(|e| e.last_cost.stockout).collect(),
            cumulative_stockout_cost: echelons.iter().map(|e| e.cumulative_stockout_cost).collect(),
            orders_placed: echelons.iter().map(|e| e.order_pipeline.contents()).collect(),
            inbound_shipments: echelons.iter().map(|e| e.shipment_pipeline.contents()).collect(),
        }
    }

    /// Sum of cumulative holding and stockout cost over the chain.
    pub fn total_cost(&self) -> f64 {
        self.cumulative_holding_cost.iter().sum::<f64>()
            + self.cumulative_stockout_cost.iter().sum::<f64>()
    }
}

/// Outcome of one played turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    /// The turn that was played, starting at 0.
    pub turn: u32,
    pub customer_demand: u32,
    /// Retailer first.
    pub echelons: [EchelonTurn; 4],
}

/// Four echelons advanced as one synchronous state machine.
pub struct SupplyChainSimulator {
    config: SimulationConfig,
    rates: CostRates,
    echelons: Vec<EchelonState>,
    customer_demand: Vec<u32>,
    turn: u32,
    done: bool,
    history: Vec<TurnSnapshot>,
}

impl SupplyChainSimulator {
    /// Builds a simulator in its reset state. `customer_demand[t]` is the Retailer's
    /// demand at turn `t`; turns beyond the schedule see no demand.
    pub fn new(config: SimulationConfig, customer_demand: Vec<u32>) -> SimResult<Self> {
        config.validate()?;
        let rates = config.cost_rates();
        let mut sim = Self {
            config,
            rates,
            echelons: Vec::with_capacity(4),
            customer_demand,
            turn: 0,
            done: false,
            history: Vec::new(),
        };
        sim.reset();
        Ok(sim)
    }

    /// Restores the seeded initial condition and discards the history.
    pub fn reset(&mut self) {
        self.echelons = Role::ALL
            .iter()
            .map(|&role| {
                EchelonState::new(
                    role,
                    self.config.lead_times[role.index()],
                    self.config.initial_stock,
                    self.config.initial_order_rate,
                )
            })
            .collect();
        self.turn = 0;
        self.done = false;
        self.history = vec![TurnSnapshot::capture(0, &self.echelons)];
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn history(&self) -> &[TurnSnapshot] {
        &self.history
    }

    pub fn echelon(&self, role: Role) -> &EchelonState {
        &self.echelons[role.index()]
    }

    pub fn observe(&self, role: Role) -> Observation {
        self.echelons[role.index()].observe(self.turn)
    }

    pub fn observations(&self) -> [Observation; 4] {
        Role::ALL.map(|role| self.observe(role))
    }

    /// Applies all four orders at once and advances one turn.
    ///
    /// Every quantity is derived from the pre-turn state, so no echelon's outcome this
    /// turn can influence another echelon's decision for the same turn.
    pub fn step(&mut self, orders: [u32; 4]) -> SimResult<TurnReport> {
        if self.done {
            return Err(SimError::SimulationComplete {
                horizon: self.config.horizon,
            });
        }

        let customer_demand = self.customer_demand.get(self.turn as usize).copied().unwrap_or(0);

        // Orders flow upstream: what leaves echelon i's order pipeline is i+1's demand
        let mut released = [0u32; 4];
        for (i, echelon) in self.echelons.iter_mut().enumerate() {
            released[i] = echelon.place_order(orders[i]);
        }
        let demand = [customer_demand, released[0], released[1], released[2]];

        // Shipments flow downstream: each supplier sends its full demand, the
        // manufacturer's infinite supply sends whatever production released
        let shipped = [demand[1], demand[2], demand[3], released[3]];

        let mut outcome = Vec::with_capacity(4);
        for (i, echelon) in self.echelons.iter_mut().enumerate() {
            let (received, stock_before) =
                echelon.receive_and_serve(shipped[i], demand[i], &self.rates);
            outcome.push(EchelonTurn {
                demand: demand[i],
                shipment_received: received,
                shipment_sent: demand[i],
                order_placed: orders[i],
                stock_before,
                stock_after: echelon.stock,
                cost: echelon.last_cost,
            });
        }

        let played = self.turn;
        self.turn += 1;
        self.done = self.turn >= self.config.horizon;
        self.history.push(TurnSnapshot::capture(self.turn, &self.echelons));

        debug!(
            "Turn {}: demand {}, orders {:?}, stock {:?}",
            played,
            customer_demand,
            orders,
            self.echelons.iter().map(|e| e.stock).collect::<Vec<_>>()
        );
        if self.turn % 5 == 0 {
            let retailer = &self.echelons[0];
            info!(
                "Turn {}: Retailer stock: {}, Cost: {:.2}",
                self.turn,
                retailer.stock,
                retailer.cumulative_cost()
            );
        }
        if self.done {
            info!(
                "Horizon of {} turns reached, total chain cost {:.2}",
                self.config.horizon,
                self.total_supply_chain_cost()
            );
        }

        let echelons = [outcome[0], outcome[1], outcome[2], outcome[3]];
        Ok(TurnReport {
            turn: played,
            customer_demand,
            echelons,
        })
    }

    /// Cumulative cost of every echelon so far.
    pub fn total_supply_chain_cost(&self) -> f64 {
        self.echelons.iter().map(|e| e.cumulative_cost()).sum()
    }

    pub fn cost_breakdown(&self) -> Vec<(Role, f64)> {
        self.echelons.iter().map(|e| (e.role, e.cumulative_cost())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(horizon: u32, demand: Vec<u32>) -> SupplyChainSimulator {
        let config = SimulationConfig {
            horizon,
            ..Default::default()
        };
        SupplyChainSimulator::new(config, demand).unwrap()
    }

    #[test]
    fn reset_state_is_seeded() {
        let sim = sim(20, vec![4; 20]);
        let retailer = sim.observe(Role::Retailer);
        assert_eq!(retailer.current_stock, 12);
        assert_eq!(retailer.inbound_shipments, vec![4, 4]);
        assert_eq!(retailer.orders, vec![4, 4]);
        assert_eq!(retailer.next_incoming_order, 4);
        assert_eq!(sim.observe(Role::Manufacturer).orders, vec![4]);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.history()[0].turn, 0);
    }

    #[test]
    fn balanced_flow_keeps_stock_steady() {
        let mut sim = sim(5, vec![4; 5]);
        while !sim.is_done() {
            let report = sim.step([4; 4]).unwrap();
            for e in report.echelons {
                assert_eq!(e.stock_after, 12);
            }
        }
        // 12 units * 0.5 per echelon per turn
        assert_eq!(sim.total_supply_chain_cost(), 4.0 * 5.0 * 6.0);
    }

    #[test]
    fn stepping_past_horizon_fails() {
        let mut sim = sim(2, vec![4; 2]);
        sim.step([4; 4]).unwrap();
        sim.step([4; 4]).unwrap();
        assert!(sim.is_done());
        assert!(matches!(
            sim.step([4; 4]),
            Err(SimError::SimulationComplete { horizon: 2 })
        ));
        assert_eq!(sim.turn(), 2);
        assert_eq!(sim.history().len(), 3);
    }

    #[test]
    fn shortage_creates_backlog_and_stockout_cost() {
        let mut sim = sim(3, vec![20, 4, 4]);
        let report = sim.step([4; 4]).unwrap();
        let retailer = report.echelons[0];
        assert_eq!(retailer.stock_after, 12 + 4 - 20);
        assert_eq!(retailer.cost.stockout, 4.0);
        assert_eq!(retailer.cost.holding, 0.0);
    }

    #[test]
    fn demand_past_schedule_is_zero() {
        let mut sim = sim(3, vec![]);
        let report = sim.step([4; 4]).unwrap();
        assert_eq!(report.customer_demand, 0);
        assert_eq!(report.echelons[0].stock_after, 16);
    }

    #[test]
    fn reset_clears_progress() {
        let mut sim = sim(3, vec![9; 3]);
        sim.step([0; 4]).unwrap();
        sim.reset();
        assert_eq!(sim.turn(), 0);
        assert!(!sim.is_done());
        assert_eq!(sim.echelon(Role::Retailer).stock, 12);
        assert_eq!(sim.total_supply_chain_cost(), 0.0);
    }

    #[test]
    fn zero_lead_time_is_instantaneous() {
        let config = SimulationConfig {
            horizon: 2,
            lead_times: [0, 0, 0, 0],
            ..Default::default()
        };
        let mut sim = SupplyChainSimulator::new(config, vec![4, 4]).unwrap();
        let report = sim.step([7, 5, 3, 9]).unwrap();

        // Orders reach upstream the same turn and are shipped straight back
        assert_eq!(report.echelons[1].demand, 7);
        assert_eq!(report.echelons[0].shipment_received, 7);
        assert_eq!(report.echelons[3].shipment_received, 9);
        assert_eq!(report.echelons[3].stock_after, 12 + 9 - 3);
    }
}
