//! `hrr` entry point

use hrr_cli::{build_cli, init_tracing, run};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let verbose = matches
        .subcommand()
        .is_some_and(|(_, sub)| sub.get_flag("verbose"))
        || matches.get_flag("verbose");
    init_tracing(verbose);

    let output = match run(&matches).await {
        Ok(value) => serde_json::to_string_pretty(&value),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match output {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
