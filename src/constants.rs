//! Application-wide constants and configuration values
//!
//! This module centralizes the magic numbers used across the fetchers,
//! the HTTP layer and configuration defaults.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// First season supported by the pipeline. 1998 is the first 30-team season,
/// which the team-index map is built around.
pub const FIRST_SUPPORTED_SEASON: i32 = 1998;

/// Month (1-12) from which the current calendar year counts as a completed season.
/// The postseason ends in late October or early November.
pub const SEASON_COMPLETE_MONTH: u32 = 11;

/// First season with Statcast leaderboards. Earlier seasons are not requested
/// and their Statcast columns stay null.
pub const STATCAST_FIRST_SEASON: i32 = 2015;

/// Number of distinct requests kept by the per-run table memo.
pub const TABLE_MEMO_CAPACITY: usize = 512;

/// Name of the default log file
pub const LOG_FILE_NAME: &str = "baseball_depot.log";

/// Default qualification thresholds for provider queries
pub mod qualification {
    /// Minimum plate appearances for FanGraphs batting rows
    pub const BATTING_MIN_PA: u32 = 10;

    /// Minimum innings pitched for FanGraphs pitching rows
    pub const PITCHING_MIN_IP: u32 = 20;

    /// Minimum defensive innings for FanGraphs fielding rows
    pub const FIELDING_MIN_INN: u32 = 10;

    /// Minimum batted-ball events for Statcast batter exit velocity tables
    pub const STATCAST_BATTER_MIN_BBE: u32 = 1;

    /// Minimum plate appearances for Statcast batter expected stats
    pub const STATCAST_BATTER_MIN_PA: u32 = 10;

    /// Minimum batted-ball events for Statcast pitcher exit velocity tables
    pub const STATCAST_PITCHER_MIN_BBE: u32 = 50;

    /// Minimum plate appearances against for Statcast pitcher expected stats
    pub const STATCAST_PITCHER_MIN_PA: u32 = 50;

    /// Minimum pitches thrown for Statcast arsenal tables
    pub const STATCAST_MIN_PITCHES: u32 = 200;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "BASEBALL_DEPOT_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "BASEBALL_DEPOT_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "BASEBALL_DEPOT_HTTP_TIMEOUT";
}
