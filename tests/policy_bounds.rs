//! Property tests for replenishment policies on arbitrary, including pathological,
//! observations: empty history, deep backlog, zero demand, huge pipelines.

use beer_game::Strategy as OrderStrategy;
use beer_game::{DemandEstimator, ForecastMethod, Observation, ReplenishmentPolicy, Role, Rounding};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

fn arb_observation() -> impl Strategy<Value = Observation> {
    (
        -10_000i64..10_000,
        0u32..100,
        prop::collection::vec(0u32..1_000, 0..4),
        prop::collection::vec(0u32..1_000, 0..4),
        0u32..1_000,
    )
        .prop_map(|(stock, turn, inbound, orders, demand)| Observation {
            role: Role::Distributor,
            current_stock: stock,
            turn,
            cum_cost: 0.0,
            inbound_shipments: inbound,
            orders,
            next_incoming_order: demand,
        })
}

fn arb_history() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..1_000, 0..30)
}

fn arb_forecast() -> impl Strategy<Value = ForecastMethod> {
    prop_oneof![
        Just(ForecastMethod::LastValue),
        (0usize..10).prop_map(|window| ForecastMethod::MovingAverage { window }),
        (0usize..10).prop_map(|window| ForecastMethod::Trend { window }),
    ]
}

fn estimator(history: &[u32]) -> DemandEstimator {
    let mut est = DemandEstimator::new();
    for &d in history {
        est.record(d);
    }
    est
}

fn decide(strategy: OrderStrategy, obs: &Observation, history: &[u32], rounding: Rounding) -> u32 {
    ReplenishmentPolicy::new(strategy)
        .with_rounding(rounding)
        .decide(obs, &estimator(history), &mut Pcg64Mcg::seed_from_u64(3))
}

proptest! {
    #[test]
    fn order_up_to_orders_nothing_or_the_batch(
        obs in arb_observation(),
        history in arb_history(),
        threshold in -100i64..100,
        batch in 0u32..50,
        forecast in arb_forecast(),
    ) {
        let strategy = OrderStrategy::OrderUpTo { stock_threshold: threshold, amount_to_buy: batch, forecast };
        let order = decide(strategy, &obs, &history, Rounding::Round);
        prop_assert!(order == 0 || order == batch);
    }

    #[test]
    fn moving_average_stays_within_observed_range(
        obs in arb_observation(),
        history in arb_history(),
        window in 0usize..10,
    ) {
        let order = decide(OrderStrategy::MovingAverage { window }, &obs, &history, Rounding::Floor);
        let max = history.iter().copied().max().unwrap_or(0);
        prop_assert!(order <= max);
    }

    #[test]
    fn trend_following_is_bounded_by_slope_projection(
        obs in arb_observation(),
        history in arb_history(),
        window in 0usize..10,
        min_history in 0usize..10,
        increment in -50i64..50,
    ) {
        let strategy = OrderStrategy::TrendFollowing {
            window,
            min_history,
            default_increment: increment,
        };
        let order = decide(strategy, &obs, &history, Rounding::Round);
        // |slope| <= max, and no observation is carried more than three turns forward
        let max = history.iter().copied().max().unwrap_or(0) as i64;
        prop_assert!((order as i64) <= 4 * max + increment.max(0));
    }

    #[test]
    fn trend_following_leads_a_rising_ramp(
        start in 0u32..100,
        step in 1u32..20,
        len in 4usize..15,
    ) {
        let history: Vec<u32> = (0..len as u32).map(|i| start + i * step).collect();
        let last = *history.last().unwrap();
        let obs = Observation {
            role: Role::Retailer,
            current_stock: 0,
            turn: 0,
            cum_cost: 0.0,
            inbound_shipments: vec![],
            orders: vec![],
            next_incoming_order: last,
        };
        let strategy = OrderStrategy::TrendFollowing {
            window: 4,
            min_history: 2,
            default_increment: 0,
        };
        prop_assert_eq!(decide(strategy, &obs, &history, Rounding::Round), last + step);
    }

    #[test]
    fn base_stock_order_is_bounded(
        obs in arb_observation(),
        history in arb_history(),
        target in -1_000i64..1_000,
        forecast in arb_forecast(),
    ) {
        let order = decide(OrderStrategy::BaseStock { target, forecast }, &obs, &history, Rounding::Round);
        // forecast < 1_000, target < 1_000, inventory position >= -10_000
        prop_assert!(order <= 12_000);
    }

    #[test]
    fn random_stays_in_bounds(obs in arb_observation(), a in 0u32..100, b in 0u32..100) {
        let order = decide(OrderStrategy::Random { min: a, max: b }, &obs, &[], Rounding::Round);
        prop_assert!(order >= a.min(b) && order <= a.max(b));
    }

    #[test]
    fn constant_history_is_reproduced(value in 0u32..500, len in 4usize..20, window in 1usize..8) {
        let history = vec![value; len];
        let obs = Observation {
            role: Role::Retailer,
            current_stock: 0,
            turn: 0,
            cum_cost: 0.0,
            inbound_shipments: vec![],
            orders: vec![],
            next_incoming_order: value,
        };
        for strategy in [
            OrderStrategy::PassThrough,
            OrderStrategy::MovingAverage { window },
            OrderStrategy::TrendFollowing { window, min_history: 2, default_increment: 0 },
        ] {
            prop_assert_eq!(decide(strategy, &obs, &history, Rounding::Round), value);
        }
    }
}
