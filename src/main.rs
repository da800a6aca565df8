// src/main.rs
mod cli;
mod commands;
mod logging;

use baseball_depot::error::AppError;
use clap::Parser;
use cli::{Args, is_config_operation};
use commands::{handle_config_update_command, handle_dataset_command, handle_list_config_command};
use logging::setup_logging;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::debug!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return handle_list_config_command().await;
    }

    if is_config_operation(&args) {
        return handle_config_update_command(&args).await;
    }

    let Some((start, end)) = args.seasons() else {
        return Err(AppError::config_error("--start is required"));
    };

    let result = handle_dataset_command(&args, start, end).await;
    if let Err(e) = &result {
        tracing::error!("Dataset assembly failed ({:?}): {e}", e.kind());
        if e.is_upstream() {
            tracing::warn!("A statistics provider failed; no partial output was written");
        }
        if e.is_not_found() {
            tracing::warn!("Check the configured API domain with --list-config");
        }
    }
    result
}
