use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECONDS, LOG_FILE_NAME, env_vars, qualification};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod user_prompts;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use user_prompts::prompt_for_api_domain;
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the statistics provider gateway. Should include https:// prefix.
    pub api_domain: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for provider requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Minimum playing time for rows requested from the providers.
    #[serde(default)]
    pub qualification: Qualification,
}

/// Qualification thresholds passed to provider queries.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Qualification {
    pub batting_min_pa: u32,
    pub pitching_min_ip: u32,
    pub fielding_min_inn: u32,
    pub statcast_batter_min_bbe: u32,
    pub statcast_batter_min_pa: u32,
    pub statcast_pitcher_min_bbe: u32,
    pub statcast_pitcher_min_pa: u32,
    pub statcast_min_pitches: u32,
}

impl Default for Qualification {
    fn default() -> Self {
        Self {
            batting_min_pa: qualification::BATTING_MIN_PA,
            pitching_min_ip: qualification::PITCHING_MIN_IP,
            fielding_min_inn: qualification::FIELDING_MIN_INN,
            statcast_batter_min_bbe: qualification::STATCAST_BATTER_MIN_BBE,
            statcast_batter_min_pa: qualification::STATCAST_BATTER_MIN_PA,
            statcast_pitcher_min_bbe: qualification::STATCAST_PITCHER_MIN_BBE,
            statcast_pitcher_min_pa: qualification::STATCAST_PITCHER_MIN_PA,
            statcast_min_pitches: qualification::STATCAST_MIN_PITCHES,
        }
    }
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: String::new(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            qualification: Qualification::default(),
        }
    }
}

impl Config {
    fn with_domain(api_domain: String) -> Self {
        Config {
            api_domain,
            ..Config::default()
        }
    }

    /// Loads configuration from the default config file location.
    /// If no config file exists, prompts user for API domain and creates one.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `BASEBALL_DEPOT_API_DOMAIN` - Override API domain
    /// - `BASEBALL_DEPOT_LOG_FILE` - Override log file path
    /// - `BASEBALL_DEPOT_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            Config::with_domain(api_domain)
        } else {
            let config = Config::with_domain(prompt_for_api_domain().await?);
            config.save().await?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of file values.
    /// Unparseable timeouts are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.api_domain,
            &self.log_file_path,
            self.http_timeout_seconds,
        )
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            let q = &config.qualification;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Domain:");
            println!("{}", config.api_domain);
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Qualification:");
            println!(
                "batting PA >= {}, pitching IP >= {}, fielding Inn >= {}",
                q.batting_min_pa, q.pitching_min_ip, q.fielding_min_inn
            );
            println!(
                "Statcast batters BBE >= {} / PA >= {}, pitchers BBE >= {} / PA >= {}, pitches >= {}",
                q.statcast_batter_min_bbe,
                q.statcast_batter_min_pa,
                q.statcast_pitcher_min_bbe,
                q.statcast_pitcher_min_pa,
                q.statcast_min_pitches
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/{LOG_FILE_NAME}");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the API
    /// domain has an https:// prefix. Local addresses keep plain http.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(&Config {
            api_domain: normalize_api_domain(&self.api_domain),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn is_local_address(domain: &str) -> bool {
    let host = domain.trim_start_matches("http://");
    host.starts_with("localhost") || host.starts_with("127.0.0.1")
}

/// Forces https:// unless the domain points at the local machine.
fn normalize_api_domain(api_domain: &str) -> String {
    if api_domain.starts_with("https://") {
        api_domain.to_string()
    } else if api_domain.starts_with("http://") && is_local_address(api_domain) {
        api_domain.to_string()
    } else {
        format!("https://{}", api_domain.trim_start_matches("http://"))
    }
}
