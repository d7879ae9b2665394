mod scenario;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use scenario::{Scenario, ScenarioError};

/// Replay a select scenario and print the control's state after each step.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Write debug logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), ScenarioError> {
    if let Some(path) = &args.log {
        let log_file = File::create(path)?;
        if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file) {
            eprintln!("Failed to initialize logger: {}", e);
        }
    }

    let outcomes = Scenario::load(&args.scenario)?.run()?;
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    log::info!("replayed {} steps from {}", outcomes.len(), args.scenario.display());
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_and_log_file() {
        let args = Args::try_parse_from(["droplist-cli", "form.json", "--log", "replay.log"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("form.json"));
        assert_eq!(args.log, Some(PathBuf::from("replay.log")));
    }

    #[test]
    fn scenario_is_required() {
        assert!(Args::try_parse_from(["droplist-cli", "--log", "replay.log"]).is_err());
        assert!(Args::try_parse_from(["droplist-cli", "a.json", "b.json"]).is_err());
    }
}
