use qtsim::{bench_broad_phase, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "random_balls.yaml")]
    file_name: String,

    /// Run to `t_end` without a window
    #[arg(long)]
    headless: bool,

    /// Print the broad-phase benchmark and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_broad_phase();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    if args.headless {
        scenario.run();
        return Ok(());
    }

    run_viewer(scenario)
}

#[cfg(feature = "vis")]
fn run_viewer(scenario: Scenario) -> Result<()> {
    qtsim::run_2d(scenario);
    Ok(())
}

#[cfg(not(feature = "vis"))]
fn run_viewer(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("built without the `vis` feature; pass --headless")
}
