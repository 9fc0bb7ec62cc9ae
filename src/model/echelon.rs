// src/model/echelon.rs

use serde::{Deserialize, Serialize};

use crate::model::queues::Pipeline;
use crate::simulation::cost::{self, CostRates, TurnCost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Retailer,
    Wholesaler,
    Distributor,
    Manufacturer,
}

impl Role {
    /// Downstream to upstream. The index into this array is the echelon index.
    pub const ALL: [Role; 4] = [
        Role::Retailer,
        Role::Wholesaler,
        Role::Distributor,
        Role::Manufacturer,
    ];

    pub fn index(self) -> usize {
        match self {
            Role::Retailer => 0,
            Role::Wholesaler => 1,
            Role::Distributor => 2,
            Role::Manufacturer => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Retailer => "retailer",
            Role::Wholesaler => "wholesaler",
            Role::Distributor => "distributor",
            Role::Manufacturer => "manufacturer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything an agent is allowed to see about itself at the start of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub role: Role,
    /// Negative values are backlog.
    pub current_stock: i64,
    pub turn: u32,
    /// Cumulative holding plus stockout cost.
    pub cum_cost: f64,
    /// In arrival order, head first.
    pub inbound_shipments: Vec<u32>,
    /// This echelon's own outstanding orders, in arrival order.
    pub orders: Vec<u32>,
    /// Demand received during the last completed turn.
    pub next_incoming_order: u32,
}

/// What happened to one echelon during one turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EchelonTurn {
    pub demand: u32,
    pub shipment_received: u32,
    pub shipment_sent: u32,
    pub order_placed: u32,
    pub stock_before: i64,
    pub stock_after: i64,
    pub cost: TurnCost,
}

/// The state of a single node in the supply chain.
#[derive(Debug, Clone)]
pub struct EchelonState {
    pub role: Role,

    // Negative stock is backlog
    pub stock: i64,
    pub order_pipeline: Pipeline,
    pub shipment_pipeline: Pipeline,

    pub last_incoming_demand: u32,
    pub last_cost: TurnCost,
    pub cumulative_holding_cost: f64,
    pub cumulative_stockout_cost: f64,
}

impl EchelonState {
    /// Seeds an echelon in steady state: every pipeline slot and the last observed
    /// demand equal `order_rate`.
    pub fn new(role: Role, lead_time: usize, initial_stock: i64, order_rate: u32) -> Self {
        Self {
            role,
            stock: initial_stock,
            order_pipeline: Pipeline::new(lead_time, order_rate),
            shipment_pipeline: Pipeline::new(lead_time, order_rate),
            last_incoming_demand: order_rate,
            last_cost: TurnCost::default(),
            cumulative_holding_cost: 0.0,
            cumulative_stockout_cost: 0.0,
        }
    }

    pub fn cumulative_cost(&self) -> f64 {
        self.cumulative_holding_cost + self.cumulative_stockout_cost
    }

    /// Places this turn's order and returns the order that leaves the pipeline,
    /// which becomes the upstream echelon's demand.
    pub fn place_order(&mut self, order: u32) -> u32 {
        self.order_pipeline.advance(order)
    }

    /// Receives the arriving shipment, serves `demand` in full and charges costs.
    ///
    /// `shipped_in` is what upstream sends this turn; it enters at the tail of the
    /// shipment pipeline while the head arrives.
    pub fn receive_and_serve(
        &mut self,
        shipped_in: u32,
        demand: u32,
        rates: &CostRates,
    ) -> (u32, i64) {
        let stock_before = self.stock;
        let received = self.shipment_pipeline.advance(shipped_in);

        // Full demand always ships; any shortfall becomes backlog
        self.stock = stock_before + received as i64 - demand as i64;
        self.last_incoming_demand = demand;

        let turn_cost = cost::assess(self.stock, rates);
        self.cumulative_holding_cost += turn_cost.holding;
        self.cumulative_stockout_cost += turn_cost.stockout;
        self.last_cost = turn_cost;

        (received, stock_before)
    }

    pub fn observe(&self, turn: u32) -> Observation {
        Observation {
            role: self.role,
            current_stock: self.stock,
            turn,
            cum_cost: self.cumulative_cost(),
            inbound_shipments: self.shipment_pipeline.contents(),
            orders: self.order_pipeline.contents(),
            next_incoming_order: self.last_incoming_demand,
        }
    }
}
