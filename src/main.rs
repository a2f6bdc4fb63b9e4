use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drift_physics::{
    InputScript, JsonLinesPresenter, Presenter, Settings, Simulation, SpawnManager,
};

/// Headless drift-car host: runs the simulation and prints snapshots as JSON lines.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Settings file (toml/yaml/json); missing file means defaults
    #[arg(long, default_value = "drift.toml")]
    config: PathBuf,

    /// Input script (JSON segments); defaults to the built-in drift demo
    #[arg(long)]
    script: Option<PathBuf>,

    /// Number of ticks to run (defaults to the script length)
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of cars on the starting grid
    #[arg(long)]
    vehicles: Option<usize>,

    /// Pace ticks against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Publish every Nth tick
    #[arg(long)]
    snapshot_every: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drift_physics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(Some(&args.config))
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if let Some(n) = args.ticks {
        settings.run.ticks = n;
    }
    if let Some(n) = args.vehicles {
        settings.run.vehicles = n;
    }
    if let Some(n) = args.snapshot_every {
        settings.run.snapshot_every = n;
    }
    settings.run.realtime |= args.realtime;

    let script = match &args.script {
        Some(path) => InputScript::from_path(path)
            .with_context(|| format!("loading input script {}", path.display()))?,
        None => InputScript::drift_demo(),
    };

    info!("🚀 Starting drift simulation...");

    let mut sim = Simulation::for_vehicle(&settings.vehicle);
    let mut grid = SpawnManager::new(settings.spawn.clone());
    for _ in 0..settings.run.vehicles {
        let (lane, pose) = grid.allocate();
        let id = sim.spawn_vehicle(settings.vehicle, pose)?;
        info!(vehicle = %id, lane = lane.as_str(), "on the grid");
    }

    let total = if settings.run.ticks > 0 {
        settings.run.ticks
    } else {
        script.total_ticks()
    };
    let every = settings.run.snapshot_every.max(1);
    let fixed_dt = settings.vehicle.fixed_timestep;

    let mut presenter = JsonLinesPresenter::new(BufWriter::new(io::stdout().lock()));

    // Fixed timestep, same cadence as the physics
    let mut ticker = interval(Duration::from_secs_f32(fixed_dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    for t in 0..total {
        let frame_dt = if settings.run.realtime {
            ticker.tick().await;
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            dt
        } else {
            fixed_dt
        };

        sim.set_input_all(script.input_at(t));
        let snapshot = sim.tick(frame_dt);

        if snapshot.tick % every == 0 {
            presenter.present(&snapshot)?;
        }
    }

    presenter.into_inner().flush()?;

    let final_snapshot = sim.snapshot();
    for v in &final_snapshot.vehicles {
        info!(vehicle = %v.id, x = v.x, y = v.y, angle = v.angle, speed = v.speed, "final pose");
    }

    let ids: Vec<_> = sim.vehicle_ids().collect();
    for id in ids {
        sim.despawn_vehicle(id);
    }
    info!(ticks = sim.tick_count(), "🏁 simulation finished");

    Ok(())
}
