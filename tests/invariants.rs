//! Property tests for the simulator's accounting invariants.
//!
//! Uses proptest to verify, for arbitrary orders and customer demand:
//! 1. Inventory balance: stock = previous stock + shipment received - demand
//! 2. Cost monotonicity: cumulative costs never decrease
//! 3. Cost exclusivity: holding and stockout are never charged together
//! 4. Lead times: an order reaches upstream, and a shipment reaches downstream,
//!    exactly `lead_time` turns after it was sent

use beer_game::{SimulationConfig, SupplyChainSimulator, TurnReport};
use proptest::prelude::*;

const LEAD_TIMES: [usize; 4] = [2, 2, 2, 1];
const INITIAL_RATE: u32 = 4;

fn play(demand: Vec<u32>, orders: &[[u32; 4]]) -> (SupplyChainSimulator, Vec<TurnReport>) {
    let config = SimulationConfig {
        horizon: orders.len() as u32,
        ..Default::default()
    };
    let mut sim = SupplyChainSimulator::new(config, demand).unwrap();
    let reports = orders.iter().map(|o| sim.step(*o).unwrap()).collect();
    (sim, reports)
}

fn arb_orders() -> impl Strategy<Value = Vec<[u32; 4]>> {
    prop::collection::vec(prop::array::uniform4(0u32..30), 1..30)
}

fn arb_demand() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..30, 0..40)
}

proptest! {
    #[test]
    fn inventory_balance_holds_exactly(demand in arb_demand(), orders in arb_orders()) {
        let (_, reports) = play(demand, &orders);
        let mut previous = [12i64; 4];

        for report in &reports {
            for (i, e) in report.echelons.iter().enumerate() {
                prop_assert_eq!(e.stock_before, previous[i]);
                prop_assert_eq!(
                    e.stock_after,
                    e.stock_before + e.shipment_received as i64 - e.demand as i64
                );
                previous[i] = e.stock_after;
            }
        }
    }

    #[test]
    fn cumulative_costs_never_decrease(demand in arb_demand(), orders in arb_orders()) {
        let (sim, _) = play(demand, &orders);
        for pair in sim.history().windows(2) {
            for i in 0..4 {
                prop_assert!(pair[1].cumulative_holding_cost[i] >= pair[0].cumulative_holding_cost[i]);
                prop_assert!(pair[1].cumulative_stockout_cost[i] >= pair[0].cumulative_stockout_cost[i]);
            }
        }
    }

    #[test]
    fn holding_and_stockout_are_exclusive(demand in arb_demand(), orders in arb_orders()) {
        let (_, reports) = play(demand, &orders);
        for report in &reports {
            for e in &report.echelons {
                prop_assert!(e.cost.holding == 0.0 || e.cost.stockout == 0.0);
                prop_assert!(e.cost.holding >= 0.0 && e.cost.stockout >= 0.0);
            }
        }
    }

    #[test]
    fn orders_arrive_upstream_after_lead_time(demand in arb_demand(), orders in arb_orders()) {
        let (_, reports) = play(demand, &orders);

        for (t, report) in reports.iter().enumerate() {
            for i in 0..3 {
                let lead = LEAD_TIMES[i];
                let expected = if t >= lead { orders[t - lead][i] } else { INITIAL_RATE };
                prop_assert_eq!(report.echelons[i + 1].demand, expected);
            }
        }
    }

    #[test]
    fn shipments_arrive_downstream_after_lead_time(demand in arb_demand(), orders in arb_orders()) {
        let (_, reports) = play(demand, &orders);

        for (t, report) in reports.iter().enumerate() {
            for i in 0..3 {
                let lead = LEAD_TIMES[i];
                let expected = if t >= lead {
                    reports[t - lead].echelons[i + 1].shipment_sent
                } else {
                    INITIAL_RATE
                };
                prop_assert_eq!(report.echelons[i].shipment_received, expected);
            }

            // Manufacturer: one turn to reach infinite supply, one turn to ship back
            let expected = if t >= 2 { orders[t - 2][3] } else { INITIAL_RATE };
            prop_assert_eq!(report.echelons[3].shipment_received, expected);
        }
    }

    #[test]
    fn pipelines_keep_their_length(demand in arb_demand(), orders in arb_orders()) {
        let (sim, _) = play(demand, &orders);
        for snapshot in sim.history() {
            for i in 0..4 {
                prop_assert_eq!(snapshot.orders_placed[i].len(), LEAD_TIMES[i]);
                prop_assert_eq!(snapshot.inbound_shipments[i].len(), LEAD_TIMES[i]);
            }
        }
    }
}
