//! Baseball season dataset assembler
//!
//! This library pulls season leaderboards, Statcast tables, WAR, team
//! aggregates, schedules, standings and player registers from a statistics
//! gateway and joins them into player-keyed tables for a range of seasons.
//!
//! # Examples
//!
//! ```rust,no_run
//! use baseball_depot::{Assembler, AppError, Config, HttpProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let provider = HttpProvider::from_config(&config)?;
//!     let assembler = Assembler::with_qualification(provider, config.qualification);
//!
//!     let batting = assembler.gen_batting(2021, 2023).await?;
//!     for (name, table) in batting.tables() {
//!         println!("{name}: {} rows", table.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalogs;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod pipeline;
pub mod table;
pub mod teams;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::{Config, Qualification};
pub use data_fetcher::{HttpProvider, StatsProvider, TableRequest};
pub use error::{AppError, ErrorKind};
pub use pipeline::{Assembler, MasterTables, PlayerTables, SeasonRange};
pub use table::Table;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
