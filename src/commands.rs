use crate::cli::{Args, Dataset};
use baseball_depot::config::Config;
use baseball_depot::config::user_prompts::prompt_for_api_domain;
use baseball_depot::error::AppError;
use baseball_depot::pipeline::Assembler;
use baseball_depot::table::Table;
use baseball_depot::HttpProvider;
use serde::Serialize;
use std::io::{Write, stdout};
use tracing::info;

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--config, --set-log-file, --clear-log-file).
///
/// An empty `--config` value prompts for the new domain.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = if new_domain.is_empty() {
            prompt_for_api_domain().await?
        } else {
            new_domain.clone()
        };
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Assembles the requested dataset and prints it.
///
/// Prints one `name: rows x columns` line per table, or the tables as a
/// JSON object keyed by table name with `--json`.
pub async fn handle_dataset_command(args: &Args, start: i32, end: i32) -> Result<(), AppError> {
    let config = Config::load().await?;
    let provider = HttpProvider::from_config(&config)?;
    let assembler = Assembler::with_qualification(provider, config.qualification);

    info!("Assembling {:?} dataset for {start}-{end}", args.dataset);
    match args.dataset {
        Dataset::Batting => {
            let tables = assembler.gen_batting(start, end).await?;
            emit(args.json, &tables, &tables.tables())
        }
        Dataset::Pitching => {
            let tables = assembler.gen_pitching(start, end).await?;
            emit(args.json, &tables, &tables.tables())
        }
        Dataset::Master => {
            let tables = assembler.master(start, end).await?;
            emit(args.json, &tables, &tables.tables())
        }
    }
}

fn emit<T: Serialize>(json: bool, all: &T, tables: &[(&str, &Table)]) -> Result<(), AppError> {
    let mut out = stdout().lock();
    if json {
        serde_json::to_writer(&mut out, all)?;
        writeln!(out)?;
    } else {
        for line in summary_lines(tables) {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn summary_lines(tables: &[(&str, &Table)]) -> Vec<String> {
    let width = tables.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    tables
        .iter()
        .map(|(name, table)| {
            format!(
                "{name:<width$}  {} rows x {} columns",
                table.len(),
                table.width()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines_are_aligned() {
        let empty = Table::new(["key_mlbam", "Season"]);
        let lines = summary_lines(&[("war", &empty), ("statcast", &empty)]);
        assert_eq!(lines[0], "war       0 rows x 2 columns");
        assert_eq!(lines[1], "statcast  0 rows x 2 columns");
    }
}
