use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, ValueEnum};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Which dataset to assemble.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
    /// Batting statistics, Statcast, WAR, team batting, biographies and identities
    Batting,
    /// Pitching statistics, Statcast, WAR, team pitching, biographies and identities
    Pitching,
    /// Every table, with identities shared by batters and pitchers
    Master,
}

/// Returns true when the arguments only touch the stored configuration
/// and no dataset should be assembled.
pub fn is_config_operation(args: &Args) -> bool {
    args.new_api_domain.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// Baseball season dataset assembler
///
/// Pulls season leaderboards, Statcast tables, WAR, team aggregates,
/// schedules, standings and player registers for a range of seasons and
/// joins them into player-keyed tables.
///
/// By default a summary line with row and column counts is printed per
/// table. Use --json to print the tables themselves.
#[derive(Parser, Debug)]
#[command(author = "Niko Salonen", version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// First season of the range
    #[arg(
        short = 's',
        long = "start",
        value_name = "YEAR",
        required_unless_present_any = ["new_api_domain", "new_log_file_path", "clear_log_file_path", "list_config"]
    )]
    pub start: Option<i32>,

    /// Last season of the range. Defaults to the start season.
    #[arg(short = 'e', long = "end", value_name = "YEAR")]
    pub end: Option<i32>,

    /// Dataset to assemble
    #[arg(long = "dataset", value_enum, default_value_t = Dataset::Master)]
    pub dataset: Dataset,

    /// Print the assembled tables as JSON instead of the summary.
    /// Logs then go to the log file only.
    #[arg(long = "json", help_heading = "Output")]
    pub json: bool,

    /// Update API domain in config. Will prompt for new domain if not provided.
    #[arg(
        long = "config",
        help_heading = "Configuration",
        value_name = "API_DOMAIN",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub new_api_domain: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Log at debug level, including every provider request and table shape.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

impl Args {
    /// The requested `(start, end)` seasons, with `end` defaulting to `start`.
    pub fn seasons(&self) -> Option<(i32, i32)> {
        self.start.map(|start| (start, self.end.unwrap_or(start)))
    }
}
