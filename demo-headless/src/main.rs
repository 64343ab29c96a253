use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wildfire_core::{FireSimError, Simulation, SimulationConfig, TerrainConfig, WindConfig};

/// Headless wildfire spread demo
#[derive(Parser, Debug)]
#[command(name = "wildfire-demo")]
#[command(
    about = "Procedural terrain and stochastic fire spread, printed as text",
    long_about = None
)]
struct Args {
    /// Grid width in cells (border included)
    #[arg(long, default_value_t = 80)]
    nx: usize,

    /// Grid height in cells (border included)
    #[arg(long, default_value_t = 40)]
    ny: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Probability a seeded cell starts as tree
    #[arg(long, default_value_t = 0.525)]
    tree_density: f32,

    /// Probability a seeded cell starts as brush
    #[arg(long, default_value_t = 0.425)]
    brush_density: f32,

    /// Number of water bodies
    #[arg(long, default_value_t = 2)]
    water_bodies: usize,

    /// Area of each water body in cells
    #[arg(long, default_value_t = 150.0)]
    water_size: f32,

    /// Vegetation smoothing passes
    #[arg(short, long, default_value_t = 9)]
    iterations: usize,

    /// Wind speed in km/h (carried, not applied to spread)
    #[arg(long, default_value_t = 15.0)]
    wind_speed: f32,

    /// Wind bearing in degrees (carried, not applied to spread)
    #[arg(long, default_value_t = 45.0)]
    wind_bearing: f32,

    /// Maximum ticks to run
    #[arg(short, long, default_value_t = 500)]
    max_ticks: u64,

    /// Print the grid every N ticks (0 = only first and last)
    #[arg(short, long, default_value_t = 25)]
    report_interval: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), FireSimError> {
    let config = SimulationConfig {
        nx: args.nx,
        ny: args.ny,
        seed: args.seed,
        terrain: TerrainConfig {
            tree_density: args.tree_density,
            brush_density: args.brush_density,
            water_bodies: args.water_bodies,
            water_size: args.water_size,
            smoothing_iterations: args.iterations,
            ..Default::default()
        },
        wind: WindConfig {
            speed: args.wind_speed,
            bearing: args.wind_bearing,
        },
    };

    println!("=== Wildfire Spread Demo ===\n");
    let mut sim = Simulation::new(config)?;
    println!(
        "Grid {}x{}, seed {}, wind {:.0} km/h from {:.0}°\n",
        args.nx, args.ny, args.seed, args.wind_speed, args.wind_bearing
    );
    print_frame(&sim);

    while !sim.is_extinguished() && sim.stats().tick < args.max_ticks {
        let ignited = sim.step();
        let stats = sim.stats();
        if args.report_interval > 0 && stats.tick % args.report_interval == 0 {
            println!(
                "t={:>4}  +{:<3} burning={:<5} burnt={:<5} affected={:.1}%",
                stats.tick,
                ignited,
                stats.burning,
                stats.burnt,
                stats.affected_fraction() * 100.0
            );
            print_frame(&sim);
        }
    }

    let stats = sim.stats();
    if sim.is_extinguished() {
        info!("Fire extinguished after {} ticks", stats.tick);
    } else {
        warn!("Stopped at tick limit with {} cells still burning", stats.burning);
    }
    println!("=== Final state after {} ticks ===", stats.tick);
    print_frame(&sim);
    println!(
        "Burnt {} cells ({:.1}% of vegetation), {} still burning",
        stats.burnt,
        stats.affected_fraction() * 100.0,
        stats.burning
    );
    let mut by_kind: Vec<_> = stats.burnt_by_kind.iter().collect();
    by_kind.sort_by_key(|(kind, _)| kind.code());
    for (kind, count) in by_kind {
        println!("  {kind:<6} {count}");
    }
    Ok(())
}

fn print_frame(sim: &Simulation) {
    let engine = sim.engine();
    for y in 0..engine.ny() {
        let row: String = (0..engine.nx()).map(|x| engine.state_at(x, y).glyph()).collect();
        println!("{row}");
    }
    println!();
}
