//! Property-based tests: evaluator determinism, transition totality and
//! reading bounds over long randomized runs.

use pump_scram_sim as pss;

use proptest::prelude::*;
use pss::{
    Baselines, ControllerConfig, Drift, ModelParams, OperatorCommand, ParameterModel,
    PumpController, PumpFsm, PumpState, Readings, Thresholds,
};

fn any_state() -> impl Strategy<Value = PumpState> {
    prop::sample::select(PumpState::ALL.to_vec())
}

fn any_command() -> impl Strategy<Value = OperatorCommand> {
    prop::sample::select(OperatorCommand::ALL.to_vec())
}

fn any_readings() -> impl Strategy<Value = Readings> {
    (0.0f64..400.0, 0.0f64..600.0, 0.0f64..=100.0).prop_map(
        |(pressure, temperature, water_level)| Readings {
            pressure,
            temperature,
            water_level,
        },
    )
}

fn in_bounds(r: &Readings) -> bool {
    r.pressure >= 0.0 && r.temperature >= 0.0 && (0.0..=100.0).contains(&r.water_level)
}

proptest! {
    /// Same inputs, same verdict, under both profiles.
    #[test]
    fn evaluate_is_deterministic(r in any_readings(), single in any::<bool>()) {
        let t = if single { Thresholds::single_tier() } else { Thresholds::dual_band() };
        prop_assert_eq!(pss::evaluate(&r, &t), pss::evaluate(&r, &t));
    }

    /// Violations never repeat a parameter and keep diagnostic order.
    #[test]
    fn violations_are_ordered(r in any_readings(), single in any::<bool>()) {
        let t = if single { Thresholds::single_tier() } else { Thresholds::dual_band() };
        let names = pss::evaluate(&r, &t).names();
        let order = ["temperature", "pressure", "water_level"];
        let positions: Vec<_> = names
            .iter()
            .map(|n| order.iter().position(|o| o == n).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// Exactly one successor per triple, and readings move only on the
    /// transitions that reset or zero them.
    #[test]
    fn apply_is_total(
        state in any_state(),
        command in any_command(),
        tripped in any::<bool>(),
        r in any_readings(),
    ) {
        let mut fsm = PumpFsm::with_state(state, r, Baselines::default());
        let transition = fsm.apply(command, tripped);
        let to = pss::next_state(state, command, tripped);
        prop_assert_eq!(fsm.state(), to);
        prop_assert_eq!(transition.is_some(), to != state);

        let resets = matches!(
            (state, to),
            (PumpState::Off, PumpState::Starting)
                | (PumpState::Operating, PumpState::Off)
                | (PumpState::Resetting, PumpState::Off)
                | (PumpState::Fault, PumpState::EmergencyScram)
        );
        if !resets {
            prop_assert_eq!(fsm.readings(), r);
        }
        prop_assert_eq!(fsm.readings().water_level, r.water_level);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// 10,000 ticks of a noisy model never leave the physical bounds, even
    /// with walks wide enough to hit every clamp.
    #[test]
    fn model_stays_in_bounds(seed in any::<u64>(), wide in any::<bool>()) {
        let params = if wide {
            ModelParams {
                pressure: Drift::walk(25.0),
                temperature: Drift::walk(25.0),
                water_level: Drift::walk(25.0),
                ..ModelParams::random_walk()
            }
        } else {
            ModelParams::default()
        };
        let mut model = ParameterModel::seeded(params, seed);
        let mut r = Readings::default();
        for _ in 0..10_000 {
            r = model.advance(r, PumpState::Operating).readings;
            prop_assert!(in_bounds(&r), "{:?}", r);
        }
    }

    /// Full controller under random operator input: readings stay in
    /// bounds and SCRAM is only ever left through a reset.
    #[test]
    fn controller_respects_scram_latch(
        seed in any::<u64>(),
        commands in prop::collection::vec(any_command(), 10_000),
    ) {
        let mut controller = PumpController::seeded(&ControllerConfig::pump(), seed).unwrap();
        for command in commands {
            let before = controller.state();
            let report = controller.tick(command);
            prop_assert!(in_bounds(&report.step.readings));
            if before == PumpState::EmergencyScram && command != OperatorCommand::Reset {
                prop_assert_eq!(report.step.state, PumpState::EmergencyScram);
            }
        }
    }
}
