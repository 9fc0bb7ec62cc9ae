//! Four-echelon beer distribution game.
//!
//! A Retailer, Wholesaler, Distributor and Manufacturer each order from their upstream
//! neighbour every turn. Orders and shipments travel through fixed-length pipelines,
//! and no agent sees anyone's stock but its own.

pub mod error;
pub mod io;
pub mod model;
pub mod rng;
pub mod simulation;
pub mod strategy;

pub use error::{SimError, SimResult};
pub use model::agent::Agent;
pub use model::echelon::{EchelonState, Observation, Role};
pub use model::queues::Pipeline;
pub use simulation::config::{GameConfig, SimulationConfig};
pub use simulation::engine::{SupplyChainSimulator, TurnReport, TurnSnapshot};
pub use simulation::game::{Game, GameSummary};
pub use strategy::forecast::{DemandEstimator, ForecastMethod};
pub use strategy::policy::{ReplenishmentPolicy, Rounding, Strategy};
