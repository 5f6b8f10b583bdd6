//! Long simulation runs with scripted churn.

use fortron_core::{BlockPos, TransferMode};
use fortron_grid::Frequency;
use fortron_sim::{
    CapacitorId, CapacitorSpec, ChurnAction, ChurnEvent, GridEvent, Simulation, SimulationConfig,
};
use proptest::prelude::*;

/// Energy lost to broken capacitors over the whole timeline.
fn lost_energy(sim: &Simulation) -> i64 {
    sim.events()
        .iter()
        .filter_map(|e| match e {
            GridEvent::CapacitorBroken { energy, .. } => Some(*energy),
            _ => None,
        })
        .sum()
}

/// Energy brought in by capacitors placed after the start.
fn placed_energy(config: &SimulationConfig) -> i64 {
    config
        .churn
        .iter()
        .filter_map(|c| match &c.action {
            ChurnAction::Place { capacitor } => Some(capacitor.energy),
            _ => None,
        })
        .sum()
}

#[test]
fn json_config_runs_to_completion() {
    let config = SimulationConfig::from_json_str(
        r#"{
            "ticks": 60,
            "capacitors": [
                { "position": { "x": 0, "y": 64, "z": 0 }, "energy": 1000, "mode": "distribute" },
                { "position": { "x": 3, "y": 64, "z": 0 } },
                { "position": { "x": 6, "y": 64, "z": 0 } }
            ],
            "churn": [
                { "tick": 10, "action": { "kind": "place",
                    "capacitor": { "position": { "x": 9, "y": 64, "z": 0 }, "energy": 400 } } },
                { "tick": 20, "action": { "kind": "set_mode", "id": 1, "mode": "drain" } },
                { "tick": 30, "action": { "kind": "break", "id": 2 } },
                { "tick": 40, "action": { "kind": "retune", "id": 3, "frequency": 5 } }
            ]
        }"#,
    )
    .unwrap();
    let expected = config.capacitors.iter().map(|c| c.energy).sum::<i64>() + placed_energy(&config);

    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();

    assert_eq!(sim.current_tick(), 60);
    assert_eq!(sim.capacitor_count(), 3);
    assert_eq!(sim.total_energy() + lost_energy(&sim), expected);

    assert_eq!(sim.grid().frequencies(), vec![Frequency(0), Frequency(5)]);
    assert_eq!(
        sim.get(CapacitorId(1)).map(|c| c.mode()),
        Some(TransferMode::Drain)
    );
}

#[test]
fn timeline_ticks_never_go_backwards() {
    let mut sim = Simulation::new(SimulationConfig::demo()).unwrap();
    sim.run().unwrap();

    let ticks: Vec<u64> = sim.events().iter().map(GridEvent::tick).collect();
    assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn camouflaged_pair_balances_without_beams() {
    let config = SimulationConfig {
        ticks: 5,
        capacitors: vec![
            CapacitorSpec {
                camouflaged: true,
                ..CapacitorSpec::at(BlockPos::new(0, 64, 0), 800)
            },
            CapacitorSpec::at(BlockPos::new(2, 64, 0), 0),
        ],
        churn: Vec::new(),
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();

    assert!(!sim.events().iter().any(|e| matches!(e, GridEvent::Beam { .. })));
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.capacitors[0].energy, 400);
    assert_eq!(snapshot.capacitors[1].energy, 400);
}

/// One scripted change before ids are bound: `pick` selects among the
/// capacitors alive at that point.
type RawChurn = (u64, u8, usize, i64, i32, u32, u8);

fn raw_churn() -> impl Strategy<Value = RawChurn> {
    (0u64..30, 0u8..4, any::<usize>(), 0i64..500, 0i32..10, 0u32..3, 0u8..4)
}

/// Bind raw churn to capacitors that exist when it applies, replaying the
/// simulation's id assignment in tick order.
fn script(initial: usize, mut raw: Vec<RawChurn>) -> Vec<ChurnEvent> {
    raw.sort_by_key(|step| step.0);
    let mut alive: Vec<u64> = (0..initial as u64).collect();
    let mut next_id = initial as u64;
    let mut churn = Vec::new();

    for (tick, kind, pick, energy, x, frequency, mode) in raw {
        let action = if kind == 0 {
            alive.push(next_id);
            next_id += 1;
            ChurnAction::Place {
                capacitor: CapacitorSpec::at(BlockPos::new(x, 64, 0), energy),
            }
        } else if alive.is_empty() {
            continue;
        } else {
            let slot = pick % alive.len();
            let id = CapacitorId(alive[slot]);
            match kind {
                1 => {
                    alive.remove(slot);
                    ChurnAction::Break { id }
                }
                2 => ChurnAction::Retune {
                    id,
                    frequency: Frequency(frequency),
                },
                _ => ChurnAction::SetMode {
                    id,
                    mode: TransferMode::from_index(mode).unwrap_or_default(),
                },
            }
        };
        churn.push(ChurnEvent { tick, action });
    }
    churn
}

proptest! {
    #[test]
    fn energy_is_conserved_under_churn(
        energies in prop::collection::vec(0i64..=1000, 2..8),
        raw in prop::collection::vec(raw_churn(), 0..12),
    ) {
        let capacitors: Vec<_> = energies
            .iter()
            .enumerate()
            .map(|(i, &energy)| CapacitorSpec::at(BlockPos::new(i as i32 * 2, 64, 0), energy))
            .collect();
        let config = SimulationConfig {
            ticks: 30,
            churn: script(capacitors.len(), raw),
            capacitors,
        };
        let expected = energies.iter().sum::<i64>() + placed_energy(&config);

        let mut sim = Simulation::new(config).unwrap();
        let result = sim.run();

        prop_assert!(result.is_ok(), "run failed: {:?}", result.err());
        prop_assert_eq!(sim.current_tick(), 30);
        prop_assert_eq!(sim.total_energy() + lost_energy(&sim), expected);
        for state in sim.snapshot().capacitors {
            prop_assert!(state.energy >= 0 && state.energy <= state.capacity);
        }
    }
}
