use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API domain cannot be empty
/// - API domain must be a valid URL or domain name
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
/// - HTTP timeout must be at least one second
pub fn validate_config(
    api_domain: &str,
    log_file_path: &Option<String>,
    http_timeout_seconds: u64,
) -> Result<(), AppError> {
    if api_domain.is_empty() {
        return Err(AppError::config_error("API domain cannot be empty"));
    }

    if !api_domain.starts_with("http://")
        && !api_domain.starts_with("https://")
        && !api_domain.contains('.')
        && !api_domain.starts_with("localhost")
    {
        return Err(AppError::config_error(
            "API domain must be a valid URL or domain name",
        ));
    }

    if http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Parent directory must exist or be creatable
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_domain_rules() {
        assert!(validate_config("https://api.example.com", &None, 30).is_ok());
        assert!(validate_config("api.example.com", &None, 30).is_ok());
        assert!(validate_config("localhost:3000", &None, 30).is_ok());
        assert!(validate_config("", &None, 30).is_err());
        assert!(validate_config("not-a-domain", &None, 30).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = validate_config("https://api.example.com", &None, 0).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_log_path_parent_is_created() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("a").join("b").join("depot.log");
        let log_path = Some(log_path.to_string_lossy().to_string());

        assert!(validate_config("https://api.example.com", &log_path, 30).is_ok());
        assert!(temp_dir.path().join("a").join("b").exists());
        assert!(validate_config("https://api.example.com", &Some(String::new()), 30).is_err());
    }
}
