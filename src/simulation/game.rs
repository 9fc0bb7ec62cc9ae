// src/simulation/game.rs

use log::info;
use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::model::agent::Agent;
use crate::model::echelon::Role;
use crate::rng::{RngBank, StreamSlot};
use crate::simulation::config::GameConfig;
use crate::simulation::engine::{SupplyChainSimulator, TurnReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub turns_played: u32,
    pub cost_by_role: Vec<(Role, f64)>,
    pub total_cost: f64,
}

/// A simulator plus the four agents playing it.
pub struct Game {
    simulator: SupplyChainSimulator,
    agents: Vec<Agent>,
}

impl Game {
    /// Builds the demand schedule and the agents from independent seeded streams.
    pub fn from_config(config: &GameConfig) -> SimResult<Self> {
        config.validate()?;
        let bank = RngBank::new(config.simulation.seed);

        let mut demand_rng = bank.stream(StreamSlot::CustomerDemand);
        let schedule = config
            .demand
            .generate(config.simulation.horizon as usize, &mut demand_rng)?;
        info!("Customer demand schedule: {:?}", schedule);

        let agents = Role::ALL
            .iter()
            .zip(&config.agents)
            .map(|(&role, policy)| Agent::new(role, policy.clone(), bank.stream(role.into())))
            .collect();

        let simulator = SupplyChainSimulator::new(config.simulation.clone(), schedule)?;
        Self::new(simulator, agents)
    }

    pub fn new(simulator: SupplyChainSimulator, agents: Vec<Agent>) -> SimResult<Self> {
        let roles_match =
            agents.len() == 4 && agents.iter().zip(Role::ALL).all(|(a, r)| a.role == r);
        if !roles_match {
            return Err(SimError::InvalidConfig(
                "agents must be Retailer, Wholesaler, Distributor, Manufacturer in that order".into(),
            ));
        }
        Ok(Self { simulator, agents })
    }

    pub fn simulator(&self) -> &SupplyChainSimulator {
        &self.simulator
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Returns simulator and agents to their starting state, so the next `run` plays
    /// exactly the game a freshly built one would.
    pub fn reset(&mut self) {
        self.simulator.reset();
        for agent in &mut self.agents {
            agent.reset();
        }
    }

    /// Each agent sees only its own observation; all four orders then apply at once.
    pub fn play_turn(&mut self) -> SimResult<TurnReport> {
        let observations = self.simulator.observations();
        let mut orders = [0u32; 4];
        let decisions = self.agents.iter_mut().zip(&observations).zip(orders.iter_mut());
        for ((agent, obs), order) in decisions {
            *order = agent.decide(obs);
        }
        self.simulator.step(orders)
    }

    /// Plays until the horizon and returns every turn's report.
    pub fn run(&mut self) -> SimResult<Vec<TurnReport>> {
        let mut reports = Vec::with_capacity(self.simulator.config().horizon as usize);
        while !self.simulator.is_done() {
            reports.push(self.play_turn()?);
        }
        Ok(reports)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            turns_played: self.simulator.turn(),
            cost_by_role: self.simulator.cost_breakdown(),
            total_cost: self.simulator.total_supply_chain_cost(),
        }
    }
}
