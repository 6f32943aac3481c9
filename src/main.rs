use clap::Parser;
use std::process::ExitCode;

use senti::cli::{Cli, Command};
use senti::config::load_config;
use senti::{clean, info, predict, SentiError};

fn run() -> Result<(), SentiError> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Clean(args) => clean::handle_clean(&config, args),
        Command::Predict(args) => predict::handle_predict(&config, args),
        Command::Evaluate(args) => predict::handle_evaluate(&config, args),
        Command::Info(args) => info::handle_info(&config, args),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("SENTI_LOG", "warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("senti: {e}");
            ExitCode::from(1)
        }
    }
}
