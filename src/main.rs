//! Fly a simulated elytra trip across a flat nether and log what the
//! autopilot does. Set `RUST_LOG=debug` for per-tick decisions.

use anyhow::Context;
use interfaces::types::BlockLocation;
use swarm_elytra::client::{pathfind::Goal, settings::Settings, sim::Simulation};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::opts::CliOptions;

mod bootstrap;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run() {
        // print the whole chain in non-debug fashion
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let opts = CliOptions::get();

    let mut settings = match &opts.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(seed) = opts.seed {
        settings.elytra_nether_seed = seed;
    }
    settings.elytra_auto_jump |= opts.auto_jump;

    let start = BlockLocation::new(opts.start_x, opts.start_y, opts.start_z);
    let goal = BlockLocation::new(opts.goal_x, opts.goal_y, opts.goal_z);

    anyhow::ensure!(
        start.y > opts.floor_y,
        "start {start} must be above the floor at y = {}",
        opts.floor_y
    );

    let mut world = bootstrap::flat_nether(opts.floor_y, opts.radius);
    let agent = if opts.auto_jump {
        bootstrap::on_pillar(&mut world, opts.floor_y, start)
    } else {
        bootstrap::gliding(start)
    };

    let mut sim = Simulation::new(world, agent, settings);
    sim.fly_to(Goal::Block(goal))
        .with_context(|| format!("cannot fly to {goal}"))?;

    info!(%start, %goal, "taking off");

    if sim.run(opts.ticks) {
        info!(
            ticks = sim.ticks(),
            location = %sim.agent.location,
            "autopilot finished"
        );
    } else {
        warn!(
            ticks = sim.ticks(),
            state = %sim.process().state(),
            "gave up before the autopilot finished"
        );
    }

    Ok(())
}
