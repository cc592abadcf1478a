//! End-to-end tests: raw lane readings through the fuzzy controller and
//! arbiter to the comparison report.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::collections::BTreeMap;
use std::sync::Arc;

use junction_core::{
    ControllerConfig, ControllerError, LaneArbiter, TrafficController, builtin_scenarios,
    compare_with_baseline, compute_effectiveness, evaluate_intersection,
    evaluate_intersection_concurrent, lanes_from_map, run_scenarios,
};
use junction_types::{LaneId, LaneResult, LaneState, LaneTable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn controller() -> TrafficController {
    TrafficController::new().unwrap()
}

fn table(lanes: [(f64, f64, bool); 4]) -> LaneTable<LaneState> {
    let [n, s, e, w] = lanes.map(|(density, wait, emergency)| LaneState::new(density, wait, emergency));
    LaneTable::new(n, s, e, w)
}

fn random_lane(rng: &mut SmallRng, emergency: bool) -> LaneState {
    LaneState::new(
        rng.random_range(0.0..=100.0),
        rng.random_range(0.0..=120.0),
        emergency,
    )
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn north_heavy_traffic() {
    let c = controller();
    let lanes = table([
        (85.0, 90.0, false),
        (45.0, 50.0, false),
        (10.0, 10.0, false),
        (5.0, 5.0, false),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();

    assert_eq!(decision.winner, LaneId::North);
    assert!(decision.green_duration >= 50.0);
    let north = decision.results.north.priority;
    assert!(decision.results.iter().all(|(_, r)| r.priority <= north));
    assert!(!decision.emergency_active());
}

#[test]
fn emergency_override_in_west() {
    let c = controller();
    let lanes = table([
        (85.0, 90.0, false),
        (45.0, 50.0, false),
        (10.0, 10.0, false),
        (5.0, 5.0, true),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();

    assert_eq!(decision.winner, LaneId::West);
    assert!(decision.results.west.priority >= 85.0);
    assert!(decision.green_duration >= 50.0);
    assert!(decision.emergency_active());
}

#[test]
fn builtin_scenarios_pick_expected_lanes() {
    let c = controller();
    let reports = run_scenarios(&c, &ControllerConfig::default(), &builtin_scenarios()).unwrap();
    let winners: Vec<LaneId> = reports.iter().map(|r| r.decision.winner).collect();
    assert_eq!(
        winners,
        vec![
            LaneId::North,
            // emergency in West
            LaneId::West,
            // every lane ties on priority; South has waited longest
            LaneId::South,
            LaneId::North,
            LaneId::South,
            // every lane ties on priority; East has waited longest
            LaneId::East,
        ]
    );
}

#[test]
fn balanced_lanes_tie_on_priority() {
    let c = controller();
    let lanes = table([
        (50.0, 50.0, false),
        (50.0, 52.0, false),
        (48.0, 50.0, false),
        (51.0, 50.0, false),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();
    let north = decision.results.north.priority;
    assert!(
        decision
            .results
            .iter()
            .all(|(_, r)| (r.priority - north).abs() <= LaneArbiter::default().tie_epsilon())
    );
    assert_eq!(decision.winner, LaneId::South);
}

// ---------------------------------------------------------------------------
// Emergencies
// ---------------------------------------------------------------------------

#[test]
fn emergency_lane_always_wins_over_regular_traffic() {
    let c = controller();
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..200 {
        let emergency_lane = LaneId::ALL[rng.random_range(0..4)];
        let lanes = LaneTable::from_fn(|lane| random_lane(&mut rng, lane == emergency_lane));
        let decision = evaluate_intersection(&c, &lanes).unwrap();

        assert_eq!(decision.winner, emergency_lane, "{lanes:?}");
        assert!(decision.winner_result().priority >= 85.0);
        assert!(decision.green_duration >= 50.0);
    }
}

#[test]
fn two_emergencies_resolve_on_wait_then_order() {
    let c = controller();

    let lanes = table([
        (10.0, 10.0, false),
        (80.0, 30.0, true),
        (20.0, 90.0, true),
        (90.0, 100.0, false),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();
    assert_eq!(decision.winner, LaneId::East);

    let lanes = table([
        (10.0, 40.0, true),
        (80.0, 40.0, false),
        (20.0, 40.0, true),
        (90.0, 40.0, false),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();
    assert_eq!(decision.winner, LaneId::North);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn outputs_stay_in_range_for_random_inputs() {
    let c = controller();
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..500 {
        let emergency = rng.random_bool(0.2);
        let state = random_lane(&mut rng, emergency);
        let result = c.evaluate(&state).unwrap();
        assert!((0.0..=100.0).contains(&result.priority), "{result:?}");
        assert!((10.0..=90.0).contains(&result.green_duration), "{result:?}");
        assert!(!emergency || result.priority >= 85.0);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let c = controller();
    let other = controller();
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..50 {
        let state = random_lane(&mut rng, false);
        let a = c.evaluate(&state).unwrap();
        let b = other.evaluate(&state).unwrap();
        assert_eq!(a.priority.to_bits(), b.priority.to_bits());
        assert_eq!(a.green_duration.to_bits(), b.green_duration.to_bits());
    }
}

#[tokio::test]
async fn concurrent_and_sequential_agree() {
    let c = Arc::new(controller());
    let mut rng = SmallRng::seed_from_u64(2024);

    for _ in 0..25 {
        let emergency_lane = rng.random_bool(0.3).then(|| LaneId::ALL[rng.random_range(0..4)]);
        let lanes = LaneTable::from_fn(|lane| random_lane(&mut rng, Some(lane) == emergency_lane));
        let sequential = evaluate_intersection(&c, &lanes).unwrap();
        let concurrent =
            evaluate_intersection_concurrent(Arc::clone(&c), lanes, LaneArbiter::default())
                .await
                .unwrap();
        assert_eq!(sequential, concurrent);
    }
}

// ---------------------------------------------------------------------------
// Metrics and inputs
// ---------------------------------------------------------------------------

#[test]
fn effectiveness_reference_values() {
    let results = LaneTable::from_fn(|lane| {
        let state = match lane {
            LaneId::North => LaneState::new(50.0, 20.0, false),
            LaneId::West => LaneState::new(40.0, 10.0, true),
            LaneId::South | LaneId::East => LaneState::idle(),
        };
        LaneResult {
            priority: 0.0,
            green_duration: 10.0,
            state,
        }
    });
    assert!((compute_effectiveness(&results, LaneId::North, 30.0) - 600.0).abs() < 1e-9);
    assert!((compute_effectiveness(&results, LaneId::West, 20.0) - 20_200.0).abs() < 1e-9);
}

#[test]
fn fuzzy_beats_static_baseline_on_emergency() {
    let c = controller();
    let lanes = table([
        (85.0, 90.0, false),
        (45.0, 50.0, false),
        (10.0, 10.0, false),
        (5.0, 5.0, true),
    ]);
    let decision = evaluate_intersection(&c, &lanes).unwrap();
    let report = compare_with_baseline(&decision, &ControllerConfig::default());
    assert!(report.fuzzy.effectiveness > report.baseline.effectiveness);
    assert_eq!(report.rows()[0].winner, LaneId::North);
}

#[test]
fn keyed_lane_input() {
    let c = controller();
    let mut map = BTreeMap::new();
    for lane in LaneId::ALL {
        map.insert(lane, LaneState::new(20.0, 30.0, lane == LaneId::East));
    }
    let lanes = lanes_from_map(&map).unwrap();
    let decision = evaluate_intersection(&c, &lanes).unwrap();
    assert_eq!(decision.winner, LaneId::East);

    map.remove(&LaneId::West);
    assert!(matches!(
        lanes_from_map(&map),
        Err(ControllerError::MissingLane(LaneId::West))
    ));
}

#[test]
fn out_of_range_lane_rejects_the_cycle() {
    let c = controller();
    let lanes = table([
        (50.0, 50.0, false),
        (50.0, 50.0, false),
        (50.0, 130.0, false),
        (50.0, 50.0, false),
    ]);
    let err = evaluate_intersection(&c, &lanes);
    assert!(matches!(
        err,
        Err(ControllerError::InputRange { field: "wait", .. })
    ));
}
