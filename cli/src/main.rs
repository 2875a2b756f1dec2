//! mits - integration tests for service brokers

use std::process::ExitCode;

use clap::Parser;

use mits::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = mits::logging::init(cli.log_level()) {
        eprintln!("Warning: {e:#}");
    }
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                let code = mits::output::json::error_code(&e);
                if let Ok(out) = mits::output::json::format_error(&format!("{e:#}"), code) {
                    println!("{out}");
                }
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
