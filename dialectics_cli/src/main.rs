use std::path::PathBuf;
use std::process::ExitCode;

use dialectics_kernel::formula::ExhaustiveBackend;
use dialectics_kernel::simulation::Simulation;

mod parse;

use parse::config::load_simulation_config;

fn main() -> ExitCode {
    env_logger::init();

    let matches = parse::cli::cli().get_matches();
    let path = matches
        .get_one::<PathBuf>("config")
        .expect("config is a required argument");
    let quiet = matches.get_one::<bool>("quiet").copied().unwrap_or(false);

    let mut config = match load_simulation_config(path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }

    let backend = ExhaustiveBackend::default();
    let mut simulation = Simulation::new(config);
    let reason = simulation.run(&backend);

    println!("terminated: {reason:?}");
    println!("steps: {}", simulation.trace().step_count());

    if !quiet {
        for decision in simulation.trace().decisions() {
            println!("{decision:?}");
        }
    }

    ExitCode::SUCCESS
}
