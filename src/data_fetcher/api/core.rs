//! HTTP-backed [`StatsProvider`].

use reqwest::Client;
use tracing::{debug, instrument};

use super::fetch_utils::fetch_records;
use super::http_client::create_http_client_with_timeout;
use super::urls::build_table_url;
use crate::config::Config;
use crate::data_fetcher::provider::{StatsProvider, TableRequest};
use crate::error::AppError;
use crate::table::Table;

/// Fetches provider tables from the configured API domain.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    api_domain: String,
}

impl HttpProvider {
    pub fn new(client: Client, api_domain: impl Into<String>) -> Self {
        let api_domain = api_domain.into().trim_end_matches('/').to_string();
        Self { client, api_domain }
    }

    /// Builds a provider from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(client, config.api_domain.clone()))
    }

    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }
}

impl StatsProvider for HttpProvider {
    #[instrument(skip(self), fields(source = request.source()))]
    async fn fetch_table(&self, request: &TableRequest) -> Result<Table, AppError> {
        let url = build_table_url(&self.api_domain, request);
        let table = fetch_records(&self.client, &url).await?;
        debug!(
            "{request}: {} rows x {} columns",
            table.len(),
            table.width()
        );
        Ok(table)
    }
}
