//! Fire spread behaviour over generated and hand-built terrain
//!
//! Covers the engine's observable guarantees: fuel accounting, frontier
//! closure, the border firebreak, water immunity and seeded determinism.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wildfire_core::{
    seeded_rng, BurnStage, Cell, CellState, FireSpreadEngine, Simulation, SimulationConfig,
    TerrainConfig, TerrainGenerator, TerrainGrid, TerrainKind, WindConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Random source whose every draw is the largest possible value
///
/// Uniform floats come out just below 1.0, above any ignition probability, so
/// no neighbour ever catches fire.
struct MaxDraw;

impl RngCore for MaxDraw {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(u8::MAX);
    }
}

fn all_tree_terrain() -> TerrainGrid {
    let config = TerrainConfig {
        tree_density: 1.0,
        brush_density: 0.0,
        water_bodies: 0,
        smoothing_iterations: 0,
        ..Default::default()
    };
    TerrainGenerator::new(config, ChaCha8Rng::seed_from_u64(0))
        .generate(10, 10, 0)
        .unwrap()
}

#[test]
fn test_single_tree_fire_does_not_spread_on_high_draws() {
    let terrain = all_tree_terrain();
    for (x, y) in terrain.interior() {
        assert_eq!(terrain.get(x, y), TerrainKind::Tree);
    }

    let mut engine =
        FireSpreadEngine::from_terrain(&terrain, WindConfig::default(), MaxDraw).unwrap();
    assert!(engine.ignite_at(5, 5));

    let ignited = engine.step();
    assert_eq!(ignited, 0);

    // Two of twenty ticks burned: still the first burning stage
    let cell = engine.cell(5, 5).unwrap();
    assert_eq!(cell.burning_time(), 2);
    assert_eq!(cell.get_state(), CellState::Burning(BurnStage::Stage0));

    let frontier: Vec<_> = engine.frontier().map(Cell::position).collect();
    assert_eq!(frontier, vec![(5, 5)]);
    for (x, y) in terrain.interior() {
        if (x, y) != (5, 5) {
            assert_eq!(engine.state_at(x, y), CellState::Alive(TerrainKind::Tree));
        }
    }
}

#[test]
fn test_tree_stages_follow_quarters_of_fuel() {
    let terrain = all_tree_terrain();
    let mut engine =
        FireSpreadEngine::from_terrain(&terrain, WindConfig::default(), MaxDraw).unwrap();
    assert!(engine.ignite_at(5, 5));

    // Ignition counts as the first tick of burning
    for _ in 0..4 {
        engine.step();
    }
    assert_eq!(engine.state_at(5, 5), CellState::Burning(BurnStage::Stage1));

    engine.run_until_extinguished(100);
    let cell = engine.cell(5, 5).unwrap();
    assert_eq!(cell.burning_time(), 20);
    assert_eq!(cell.get_state(), CellState::Burnt);
    assert_eq!(engine.tick(), 19);
}

#[test]
fn test_fuel_is_monotonic_and_burnt_is_terminal() {
    let config = SimulationConfig {
        nx: 50,
        ny: 50,
        seed: 17,
        terrain: TerrainConfig {
            water_bodies: 1,
            water_size: 120.0,
            smoothing_iterations: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    let fuel: Vec<u32> = sim.engine().cells().iter().map(Cell::fuel).collect();
    let mut previous: Vec<(u32, CellState)> = sim
        .engine()
        .cells()
        .iter()
        .map(|c| (c.burning_time(), c.get_state()))
        .collect();

    for _ in 0..80 {
        sim.step();
        for (i, cell) in sim.engine().cells().iter().enumerate() {
            let (time, state) = previous[i];
            assert_eq!(cell.fuel(), fuel[i]);
            assert!(cell.burning_time() >= time);
            if state == CellState::Burnt {
                assert_eq!(cell.get_state(), CellState::Burnt);
                assert_eq!(cell.burning_time(), time);
            }
            previous[i] = (cell.burning_time(), cell.get_state());
        }
        assert!(sim.engine().frontier_is_closed());
    }
}

#[test]
fn test_border_ring_never_changes() {
    let terrain = TerrainGrid::filled(20, 16, TerrainKind::Grass);
    let mut engine =
        FireSpreadEngine::from_terrain(&terrain, WindConfig::default(), seeded_rng(21, 1))
            .unwrap();
    assert!(engine.ignite_at(1, 1));
    assert!(engine.ignite_at(18, 14));

    let empty = TerrainKind::Empty.code();
    for _ in 0..60 {
        engine.step();
        let frame = engine.snapshot();
        for x in 0..20 {
            assert_eq!(frame.get(x, 0), Some(empty));
            assert_eq!(frame.get(x, 15), Some(empty));
        }
        for y in 0..16 {
            assert_eq!(frame.get(0, y), Some(empty));
            assert_eq!(frame.get(19, y), Some(empty));
        }
    }
}

#[test]
fn test_water_blocks_fire() {
    // A water column splits the grid; fire starting on the left stays there
    let mut terrain = TerrainGrid::filled(21, 12, TerrainKind::Grass);
    for y in 1..11 {
        terrain.set(10, y, TerrainKind::Water);
    }
    let mut engine =
        FireSpreadEngine::from_terrain(&terrain, WindConfig::default(), seeded_rng(8, 1))
            .unwrap();
    assert!(engine.ignite_at(3, 5));
    engine.run_until_extinguished(1_000);

    for y in 1..11 {
        assert_eq!(engine.state_at(10, y), CellState::Alive(TerrainKind::Water));
        for x in 11..20 {
            assert_eq!(engine.state_at(x, y), CellState::Alive(TerrainKind::Grass));
        }
    }
    assert!(engine.stats().burnt > 0);
}

#[test]
fn test_burnt_area_accounts_for_every_cell() {
    let terrain = TerrainGrid::filled(30, 30, TerrainKind::Grass);
    let mut engine =
        FireSpreadEngine::from_terrain(&terrain, WindConfig::default(), seeded_rng(2, 1))
            .unwrap();
    assert!(engine.ignite_at(15, 15));
    let ticks = engine.run_until_extinguished(10_000);

    let stats = engine.stats();
    assert!(stats.is_extinguished());
    assert_eq!(stats.tick, ticks);
    assert_eq!(stats.burnt + stats.unburnt, 28 * 28);
    assert_eq!(stats.burnt_by_kind.get(&TerrainKind::Grass).copied(), Some(stats.burnt));
}

#[test]
fn test_same_seed_same_fire() {
    let config = TerrainConfig {
        water_size: 500.0,
        ..Default::default()
    };
    let terrain = TerrainGenerator::new(config, seeded_rng(4, 0))
        .generate(100, 100, 6)
        .unwrap();

    let run = |seed: u64| {
        let mut engine =
            FireSpreadEngine::new(&terrain, WindConfig::default(), seeded_rng(seed, 1)).unwrap();
        let mut frames = vec![engine.snapshot()];
        for _ in 0..50 {
            engine.step();
            frames.push(engine.snapshot());
        }
        frames
    };

    assert_eq!(run(31), run(31));
}

#[test]
fn test_simulation_is_reproducible_from_config() {
    let config = SimulationConfig {
        nx: 80,
        ny: 70,
        terrain: TerrainConfig {
            water_size: 300.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    assert_eq!(a.terrain(), b.terrain());
    for _ in 0..30 {
        assert_eq!(a.step(), b.step());
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn test_wind_is_carried_but_inert() {
    let terrain = TerrainGrid::filled(25, 25, TerrainKind::Brush);
    let run = |wind: WindConfig| {
        let mut engine = FireSpreadEngine::from_terrain(&terrain, wind, seeded_rng(6, 1)).unwrap();
        assert!(engine.ignite_at(12, 12));
        for _ in 0..20 {
            engine.step();
        }
        (engine.wind(), engine.snapshot())
    };

    let calm = WindConfig { speed: 0.0, bearing: 0.0 };
    let gale = WindConfig { speed: 90.0, bearing: 270.0 };
    let (calm_wind, calm_frame) = run(calm);
    let (gale_wind, gale_frame) = run(gale);

    assert_eq!(calm_wind, calm);
    assert_eq!(gale_wind, gale);
    assert_eq!(calm_frame, gale_frame);
}
