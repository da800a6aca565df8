//! Fetching provider tables over HTTP with status-specific error handling

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::error::AppError;
use crate::table::{Record, Table};

/// Fetches `url` and decodes the body as a JSON array of records.
///
/// Transport failures and non-success statuses map to the specific
/// [`AppError`] variants. An empty array is a valid, empty table.
#[instrument(skip(client))]
pub(super) async fn fetch_records(client: &Client, url: &str) -> Result<Table, AppError> {
    info!("Fetching data from URL: {url}");

    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return if e.is_timeout() {
                Err(AppError::network_timeout(url))
            } else if e.is_connect() {
                Err(AppError::network_connection(url, e.to_string()))
            } else {
                Err(AppError::ApiFetch(e))
            };
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());
    parse_records(&response_text, url)
}

/// Decodes a response body into a table.
pub(super) fn parse_records(body: &str, url: &str) -> Result<Table, AppError> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(AppError::api_no_data("Response body is empty", url));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &body.chars().take(200).collect::<String>()
            );
            return Err(if trimmed.starts_with('[') || trimmed.starts_with('{') {
                AppError::api_unexpected_structure(e.to_string(), url)
            } else {
                AppError::api_malformed_json("Response is not valid JSON", url)
            });
        }
    };

    let Value::Array(items) = value else {
        return Err(AppError::api_unexpected_structure(
            "expected a JSON array of records",
            url,
        ));
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok::<Record, AppError>(record),
            other => Err(AppError::api_unexpected_structure(
                format!("element {index} is {other}, expected an object"),
                url,
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Decoded {} records from {url}", records.len());
    Ok(Table::from_records(records))
}
