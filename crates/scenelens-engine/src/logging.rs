//! Structured search logging.
//!
//! Keeps the search id and query attached to every lifecycle event of a
//! search.

use scenelens_models::SearchId;
use tracing::{info, warn, Span};

/// Logger for one search.
#[derive(Debug, Clone)]
pub struct SearchLogger {
    search_id: String,
    query: String,
}

impl SearchLogger {
    pub fn new(search_id: &SearchId, query: &str) -> Self {
        Self {
            search_id: search_id.to_string(),
            query: query.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            search_id = %self.search_id,
            query = %self.query,
            "Search started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            search_id = %self.search_id,
            query = %self.query,
            "Search progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            search_id = %self.search_id,
            query = %self.query,
            "Search warning: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            search_id = %self.search_id,
            query = %self.query,
            "Search completed: {}", message
        );
    }

    /// Create a tracing span for this search.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "search",
            search_id = %self.search_id,
            query = %self.query
        )
    }
}
