//! Workspace trait: the document store transcripts are read from and summary
//! pages are written to.

use chrono::{DateTime, Utc};

use taskscribe_types::page::{CreatedPage, NewPage, Page, WorkspaceError};

/// Operations the pipeline needs from the hosted workspace.
///
/// Implementations live in taskscribe-infra (e.g., `NotionClient`).
pub trait Workspace: Send + Sync {
    /// Fetch a single page with its properties.
    fn retrieve_page(
        &self,
        page_id: &str,
    ) -> impl std::future::Future<Output = Result<Page, WorkspaceError>> + Send;

    /// Create a page with the given title and block children.
    fn create_page(
        &self,
        page: &NewPage,
    ) -> impl std::future::Future<Output = Result<CreatedPage, WorkspaceError>> + Send;

    /// List records of a database created strictly after `after`, oldest
    /// first, returning at most `limit` entries.
    fn query_created_after(
        &self,
        database_id: &str,
        after: DateTime<Utc>,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Page>, WorkspaceError>> + Send;
}
