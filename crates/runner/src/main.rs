use aegis_runner::{run_scenario, ScenarioConfig};
use log::info;

fn main() -> aegis_runner::Result<()> {
    env_logger::init();

    let results = run_scenario(ScenarioConfig::default())?;
    info!(
        "pipeline drained in {} iterations, {} net positions",
        results.drain_iterations,
        results.positions.len()
    );

    println!("{}", results.metrics.summary_json());
    Ok(())
}
