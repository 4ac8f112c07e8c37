//! NotionClient -- [`Workspace`] implementation over the Notion REST API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use taskscribe_core::workspace::Workspace;
use taskscribe_types::config::DEFAULT_NOTION_BASE_URL;
use taskscribe_types::page::{CreatedPage, NewPage, Page, WorkspaceError};

use super::types::{
    MAX_PAGE_SIZE, NotionErrorBody, QueryResponse, create_page_body, created_after_query,
};

/// Notion REST client.
///
/// Holds the integration token as a [`SecretString`]; it is only exposed
/// when building the `Authorization` header.
pub struct NotionClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl NotionClient {
    /// The API version every request is pinned to.
    pub const API_VERSION: &'static str = "2022-06-28";

    pub fn new(token: SecretString) -> Result<Self, WorkspaceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| WorkspaceError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: DEFAULT_NOTION_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.token.expose_secret())
            .header("Notion-Version", Self::API_VERSION)
    }

    /// Send `builder` and decode a 2xx body as `T`, mapping everything else
    /// onto [`WorkspaceError`].
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        subject: &str,
    ) -> Result<T, WorkspaceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| WorkspaceError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<NotionErrorBody>(&body).ok();
            return Err(match status.as_u16() {
                401 => WorkspaceError::Unauthorized,
                404 => WorkspaceError::NotFound(subject.to_string()),
                code => {
                    let (code_name, message) = match parsed {
                        Some(err) => (err.code, err.message),
                        None => (String::new(), body),
                    };
                    WorkspaceError::Api {
                        status: code,
                        code: code_name,
                        message,
                    }
                }
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WorkspaceError::Deserialization(format!("failed to parse response: {e}")))
    }
}

impl Workspace for NotionClient {
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, WorkspaceError> {
        tracing::debug!(page_id, "retrieving page");
        let builder = self.request(reqwest::Method::GET, &format!("/v1/pages/{page_id}"));
        self.send(builder, page_id).await
    }

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, WorkspaceError> {
        let builder = self
            .request(reqwest::Method::POST, "/v1/pages")
            .json(&create_page_body(page));
        self.send(builder, &page.parent_page_id).await
    }

    async fn query_created_after(
        &self,
        database_id: &str,
        after: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Page>, WorkspaceError> {
        let path = format!("/v1/databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        while pages.len() < limit {
            let page_size = (limit - pages.len()).min(MAX_PAGE_SIZE);
            let body = created_after_query(after, page_size, cursor.as_deref());
            let builder = self.request(reqwest::Method::POST, &path).json(&body);
            let batch: QueryResponse = self.send(builder, database_id).await?;

            tracing::debug!(
                database_id,
                returned = batch.results.len(),
                has_more = batch.has_more,
                "database query page"
            );
            pages.extend(batch.results);

            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        pages.truncate(limit);
        Ok(pages)
    }
}
