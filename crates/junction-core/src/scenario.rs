//! Built-in demonstration scenarios and the batch runner.

use std::sync::Arc;

use junction_types::{IntersectionDecision, LaneState, LaneTable, Scenario, ScenarioReport};
use tracing::info;

use crate::arbiter::{LaneArbiter, evaluate_intersection_concurrent};
use crate::config::ControllerConfig;
use crate::controller::TrafficController;
use crate::effectiveness::compare_with_baseline;
use crate::error::ControllerError;

const fn lane(density: f64, wait: f64) -> LaneState {
    LaneState::new(density, wait, false)
}

const fn emergency(density: f64, wait: f64) -> LaneState {
    LaneState::new(density, wait, true)
}

/// The six reference scenarios, in presentation order.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "Case 1: North Heavy Traffic",
            LaneTable::new(lane(85.0, 90.0), lane(45.0, 50.0), lane(10.0, 10.0), lane(5.0, 5.0)),
        ),
        Scenario::new(
            "Case 2: West Emergency",
            LaneTable::new(
                lane(85.0, 90.0),
                lane(45.0, 50.0),
                lane(10.0, 10.0),
                emergency(5.0, 5.0),
            ),
        ),
        Scenario::new(
            "Case 3: All Lanes Balanced",
            LaneTable::new(lane(50.0, 50.0), lane(50.0, 52.0), lane(48.0, 50.0), lane(51.0, 50.0)),
        ),
        Scenario::new(
            "Case 4: Long Wait despite Low Density",
            LaneTable::new(lane(15.0, 110.0), lane(30.0, 20.0), lane(40.0, 30.0), lane(35.0, 25.0)),
        ),
        Scenario::new(
            "Case 5: High Density vs High Density with Emergency",
            LaneTable::new(
                lane(95.0, 100.0),
                emergency(90.0, 110.0),
                lane(50.0, 40.0),
                lane(50.0, 40.0),
            ),
        ),
        Scenario::new(
            "Case 6: Very Low Traffic",
            LaneTable::new(lane(5.0, 5.0), lane(10.0, 5.0), lane(5.0, 10.0), lane(5.0, 5.0)),
        ),
    ]
}

/// The scenarios named in `config`, or the built-in set when it names none.
pub fn configured_scenarios(config: &ControllerConfig) -> Vec<Scenario> {
    if config.scenarios.is_empty() {
        builtin_scenarios()
    } else {
        config.scenarios.clone()
    }
}

/// Arbitrate one scenario and compare the outcome with the baseline.
///
/// # Errors
///
/// Returns [`ControllerError::InputRange`] if a lane reading is out of
/// range.
pub fn run_scenario(
    controller: &TrafficController,
    config: &ControllerConfig,
    scenario: &Scenario,
) -> Result<ScenarioReport, ControllerError> {
    let decision = LaneArbiter::from_config(config.arbitration).decide(controller, &scenario.lanes)?;
    Ok(report(config, scenario.clone(), decision))
}

/// [`run_scenario`] with the four lanes scored in parallel.
///
/// The report is identical to the sequential one.
///
/// # Errors
///
/// Same as [`run_scenario`], plus [`ControllerError::TaskJoin`] if a
/// scoring task panicked.
pub async fn run_scenario_concurrent(
    controller: Arc<TrafficController>,
    config: &ControllerConfig,
    scenario: Scenario,
) -> Result<ScenarioReport, ControllerError> {
    let decision = evaluate_intersection_concurrent(
        controller,
        scenario.lanes,
        LaneArbiter::from_config(config.arbitration),
    )
    .await?;
    Ok(report(config, scenario, decision))
}

fn report(
    config: &ControllerConfig,
    scenario: Scenario,
    decision: IntersectionDecision,
) -> ScenarioReport {
    let comparison = compare_with_baseline(&decision, config);

    info!(
        scenario = %scenario.name,
        winner = %decision.winner,
        green_duration = decision.green_duration,
        emergency = decision.emergency_active(),
        fuzzy_effectiveness = comparison.fuzzy.effectiveness,
        static_effectiveness = comparison.baseline.effectiveness,
        fuzzy_penalty = comparison.fuzzy.system_penalty,
        static_penalty = comparison.baseline.system_penalty,
        "Scenario evaluated"
    );

    ScenarioReport {
        scenario,
        decision,
        comparison,
    }
}

/// Run scenarios in order, stopping at the first failure.
///
/// # Errors
///
/// Same as [`run_scenario`].
pub fn run_scenarios(
    controller: &TrafficController,
    config: &ControllerConfig,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioReport>, ControllerError> {
    scenarios
        .iter()
        .map(|scenario| run_scenario(controller, config, scenario))
        .collect()
}

/// Run scenarios in order through [`run_scenario_concurrent`], stopping at
/// the first failure.
///
/// # Errors
///
/// Same as [`run_scenario_concurrent`].
pub async fn run_scenarios_concurrent(
    controller: &Arc<TrafficController>,
    config: &ControllerConfig,
    scenarios: Vec<Scenario>,
) -> Result<Vec<ScenarioReport>, ControllerError> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        reports.push(run_scenario_concurrent(Arc::clone(controller), config, scenario).await?);
    }
    Ok(reports)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use junction_types::LaneId;

    use super::*;

    fn run_all() -> Vec<ScenarioReport> {
        let controller = TrafficController::new().unwrap();
        let config = ControllerConfig::default();
        run_scenarios(&controller, &config, &builtin_scenarios()).unwrap()
    }

    fn winner_of(reports: &[ScenarioReport], index: usize) -> LaneId {
        reports.get(index).unwrap().decision.winner
    }

    #[test]
    fn six_builtin_scenarios() {
        let scenarios = builtin_scenarios();
        assert_eq!(scenarios.len(), 6);
        assert_eq!(scenarios.first().map(Scenario::short_name), Some("Case 1"));
    }

    #[test]
    fn builtin_scenario_labels() {
        let names: Vec<String> = builtin_scenarios().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Case 1: North Heavy Traffic",
                "Case 2: West Emergency",
                "Case 3: All Lanes Balanced",
                "Case 4: Long Wait despite Low Density",
                "Case 5: High Density vs High Density with Emergency",
                "Case 6: Very Low Traffic",
            ]
        );
    }

    #[test]
    fn builtin_outcomes() {
        let reports = run_all();
        assert_eq!(reports.len(), 6);
        assert_eq!(winner_of(&reports, 0), LaneId::North);
        assert_eq!(winner_of(&reports, 1), LaneId::West);
        assert_eq!(winner_of(&reports, 3), LaneId::North);
        assert_eq!(winner_of(&reports, 4), LaneId::South);
    }

    #[test]
    fn emergency_scenarios_beat_the_baseline() {
        let reports = run_all();
        for index in [1, 4] {
            let report = reports.get(index).unwrap();
            assert!(report.decision.emergency_active());
            assert!(report.comparison.effectiveness_gain() > 0.0);
        }
    }

    #[test]
    #[allow(clippy::indexing_slicing)]
    fn report_wire_shape() {
        let reports = run_all();
        let json = serde_json::to_value(reports.get(1).unwrap()).unwrap();
        assert_eq!(json["scenario"]["name"], "Case 2: West Emergency");
        assert_eq!(json["scenario"]["lanes"]["west"]["emergency"], true);
        assert_eq!(json["decision"]["winner"], "West");
        assert!(json["decision"]["results"]["north"]["priority"].is_f64());
        assert_eq!(json["comparison"]["baseline"]["winner"], "North");
        assert_eq!(json["comparison"]["fuzzy"]["winner"], "West");
    }

    #[test]
    fn configured_list_replaces_builtins() {
        let mut config = ControllerConfig::default();
        assert_eq!(configured_scenarios(&config).len(), 6);
        config.scenarios = vec![Scenario::new(
            "Quiet",
            LaneTable::from_fn(|_| LaneState::idle()),
        )];
        let scenarios = configured_scenarios(&config);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios.first().map(|s| s.name.as_str()), Some("Quiet"));
    }

    #[test]
    fn invalid_scenario_stops_the_batch() {
        let controller = TrafficController::new().unwrap();
        let config = ControllerConfig::default();
        let bad = Scenario::new("Broken sensor", LaneTable::from_fn(|_| lane(-3.0, 0.0)));
        let result = run_scenarios(&controller, &config, &[bad]);
        assert!(matches!(result, Err(ControllerError::InputRange { .. })));
    }

    #[tokio::test]
    async fn concurrent_batch_matches_sequential() {
        let controller = Arc::new(TrafficController::new().unwrap());
        let config = ControllerConfig::default();
        let sequential = run_scenarios(&controller, &config, &builtin_scenarios()).unwrap();
        let concurrent = run_scenarios_concurrent(&controller, &config, builtin_scenarios())
            .await
            .unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn concurrent_batch_stops_on_invalid_scenario() {
        let controller = Arc::new(TrafficController::new().unwrap());
        let config = ControllerConfig::default();
        let bad = Scenario::new("Broken sensor", LaneTable::from_fn(|_| lane(50.0, 500.0)));
        let result = run_scenarios_concurrent(&controller, &config, vec![bad]).await;
        assert!(matches!(
            result,
            Err(ControllerError::InputRange { field: "wait", .. })
        ));
    }
}
