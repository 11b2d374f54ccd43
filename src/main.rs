use clap::Parser;
use firestore_export::cli::Cli;
use firestore_export::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Errors in the config file itself are reported by the command
    let (log_level, logging_config) = cli.logging_settings();

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "firestore-export");

    let exit_code = match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            firestore_export::log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors; flush the file log first
    drop(guard);
    process::exit(exit_code);
}
