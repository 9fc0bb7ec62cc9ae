// src/io/replay.rs

//! Plain-text rendering of a recorded history, one table per snapshot.

use std::fmt::Write;

use crate::model::echelon::Role;
use crate::simulation::engine::TurnSnapshot;

fn list(values: &[u32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Renders one snapshot. Non-positive stock is flagged with `!`.
pub fn render_snapshot(snapshot: &TurnSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "turn: {:<4} cost: {:.2}",
        snapshot.turn,
        snapshot.total_cost()
    );
    let _ = writeln!(
        out,
        "{:<13} {:>7} {:>7} {:>9} {:>9} {:>9} {:>9}  {:<12} {:<12}",
        "echelon", "stock", "demand", "hold", "hold acc", "short", "short acc", "orders", "inbound"
    );

    for (i, role) in Role::ALL.iter().enumerate() {
        let stock = snapshot.stock_level.get(i).copied().unwrap_or_default();
        let flag = if stock <= 0 { "!" } else { " " };
        let _ = writeln!(
            out,
            "{:<13} {:>6}{} {:>7} {:>9.2} {:>9.2} {:>9.2} {:>9.2}  {:<12} {:<12}",
            role.name(),
            stock,
            flag,
            snapshot.next_incoming_orders.get(i).copied().unwrap_or_default(),
            snapshot.holding_cost.get(i).copied().unwrap_or_default(),
            snapshot.cumulative_holding_cost.get(i).copied().unwrap_or_default(),
            snapshot.stockout_cost.get(i).copied().unwrap_or_default(),
            snapshot.cumulative_stockout_cost.get(i).copied().unwrap_or_default(),
            list(snapshot.orders_placed.get(i).map(Vec::as_slice).unwrap_or_default()),
            list(snapshot.inbound_shipments.get(i).map(Vec::as_slice).unwrap_or_default()),
        );
    }
    out
}

pub fn render_history(history: &[TurnSnapshot]) -> String {
    history
        .iter()
        .map(render_snapshot)
        .collect::<Vec<_>>()
        .join("\n")
}
