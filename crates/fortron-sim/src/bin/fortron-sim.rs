//! Fortron grid simulation runner
//!
//! Usage: `fortron-sim [CONFIG.json] [TICKS]`
//!
//! Without a config file the built-in demo network runs. The final grid
//! snapshot is printed as JSON on stdout; logs go to stderr.

use std::env;

use fortron_sim::{Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fortron_sim=info,fortron_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = match args.get(1) {
        Some(path) => {
            tracing::info!(%path, "loading config");
            SimulationConfig::from_json_file(path)?
        }
        None => SimulationConfig::demo().with_env_overrides()?,
    };

    if let Some(ticks) = args.get(2) {
        let ticks = ticks
            .parse()
            .map_err(|_| format!("not a tick count: {ticks:?}"))?;
        config = config.with_ticks(ticks);
    }

    tracing::info!(
        ticks = config.ticks,
        capacitors = config.capacitors.len(),
        churn = config.churn.len(),
        "starting simulation"
    );

    let mut sim = Simulation::new(config)?;
    sim.run()?;

    println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}
