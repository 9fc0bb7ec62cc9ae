// src/io/reporting.rs

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::SimResult;
use crate::model::echelon::Role;
use crate::simulation::engine::TurnReport;
use crate::simulation::engine::TurnSnapshot;

/// One CSV row: one echelon during one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub turn: u32,
    pub role: Role,
    pub stock: i64,
    pub incoming_demand: u32,
    pub order_placed: u32,
    pub shipment_received: u32,
    pub shipment_sent: u32,
    pub holding_cost: f64,
    pub stockout_cost: f64,
    pub cumulative_cost: f64,
}

/// Flattens turn reports into per-echelon rows with running cost totals.
pub fn history_records(reports: &[TurnReport]) -> Vec<HistoryRecord> {
    let mut running = [0.0f64; 4];
    let mut records = Vec::with_capacity(reports.len() * 4);
    for report in reports {
        for (i, (role, e)) in Role::ALL.iter().zip(&report.echelons).enumerate() {
            running[i] += e.cost.total();
            records.push(HistoryRecord {
                turn: report.turn,
                role: *role,
                stock: e.stock_after,
                incoming_demand: e.demand,
                order_placed: e.order_placed,
                shipment_received: e.shipment_received,
                shipment_sent: e.shipment_sent,
                holding_cost: e.cost.holding,
                stockout_cost: e.cost.stockout,
                cumulative_cost: running[i],
            });
        }
    }
    records
}

/// Writes the per-echelon turn log as CSV.
pub fn write_simulation_log(file_path: impl AsRef<Path>, reports: &[TurnReport]) -> SimResult<()> {
    let path = file_path.as_ref();
    let records = history_records(reports);

    let mut wtr = csv::Writer::from_path(path)?;
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!("Exported {} rows to '{}'", records.len(), path.display());
    Ok(())
}

/// Writes the recorded snapshot history as a JSON array.
pub fn write_history_json(file_path: impl AsRef<Path>, history: &[TurnSnapshot]) -> SimResult<()> {
    let path = file_path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, history)?;
    info!("Recorded {} snapshots to '{}'", history.len(), path.display());
    Ok(())
}

pub fn read_history_json(file_path: impl AsRef<Path>) -> SimResult<Vec<TurnSnapshot>> {
    let reader = BufReader::new(File::open(file_path)?);
    Ok(serde_json::from_reader(reader)?)
}
