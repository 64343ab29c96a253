//! Terrain generation at full reference scale

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildfire_core::{FireSimError, LayoutError, TerrainConfig, TerrainGenerator, TerrainKind};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_water_centres_do_not_overlap() {
    let config = TerrainConfig::default();
    let radius = f64::from(config.water_radius());
    assert!((radius - 30.9).abs() < 0.01);

    for seed in 0..5 {
        let mut generator = TerrainGenerator::new(config.clone(), ChaCha8Rng::seed_from_u64(seed));
        let centres = generator.place_centres(300, 300).unwrap();
        assert_eq!(centres.len(), 3);

        for (i, a) in centres.iter().enumerate() {
            for b in &centres[i + 1..] {
                let d = (a.0 as f64 - b.0 as f64).hypot(a.1 as f64 - b.1 as f64);
                assert!(d >= radius, "seed {seed}: {a:?} and {b:?} are {d:.2} apart");
            }
        }
    }
}

#[test]
fn test_reference_terrain_is_deterministic() {
    let generate = || {
        TerrainGenerator::new(TerrainConfig::default(), ChaCha8Rng::seed_from_u64(2024))
            .generate(300, 300, 9)
            .unwrap()
    };
    let a = generate();
    let b = generate();
    assert_eq!(a, b);

    let water = a.count(TerrainKind::Water);
    let vegetation =
        a.count(TerrainKind::Grass) + a.count(TerrainKind::Brush) + a.count(TerrainKind::Tree);
    assert!(water >= 3 * TerrainConfig::default().water_fill_target());
    assert_eq!(water + vegetation, 298 * 298);
    assert_eq!(a.count(TerrainKind::Empty), 300 * 4 - 4);
}

#[test]
fn test_different_seeds_differ() {
    let generate = |seed| {
        TerrainGenerator::new(TerrainConfig::dry(), ChaCha8Rng::seed_from_u64(seed))
            .generate(80, 80, 4)
            .unwrap()
    };
    assert_ne!(generate(1), generate(2));
}

#[test]
fn test_crowded_water_fails_instead_of_hanging() {
    let config = TerrainConfig {
        water_bodies: 50,
        ..Default::default()
    };
    let err = TerrainGenerator::new(config, ChaCha8Rng::seed_from_u64(7))
        .generate(70, 70, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        FireSimError::Layout(LayoutError::CentrePlacementExhausted { requested: 50, .. })
    ));
}
