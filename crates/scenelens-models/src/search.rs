//! Search requests and reports.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::segment::Segment;

/// Largest `top_k` a request may ask for.
pub const MAX_TOP_K: usize = 100;

/// Unique identifier for a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SearchId(pub String);

impl SearchId {
    /// Generate a new random search ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SearchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How scored frames are turned into results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Segment every scored frame
    #[default]
    Segments,
    /// Cap candidates with the temporal diversity selector before segmenting
    Preview,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Segments => "segments",
            SearchMode::Preview => "preview",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-text query against one video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,

    /// Maximum number of segments (and preview candidates) to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Sampling interval in seconds
    #[serde(default = "default_frame_interval")]
    pub frame_interval_seconds: f64,

    /// Override for the policy's relevance threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_threshold: Option<f64>,

    #[serde(default)]
    pub mode: SearchMode,
}

fn default_top_k() -> usize {
    10
}

fn default_frame_interval() -> f64 {
    0.25
}

impl SearchRequest {
    /// Create a request with default sampling and result limits.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: default_top_k(),
            frame_interval_seconds: default_frame_interval(),
            relevance_threshold: None,
            mode: SearchMode::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_frame_interval(mut self, seconds: f64) -> Self {
        self.frame_interval_seconds = seconds;
        self
    }

    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = Some(threshold);
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query must not be empty".to_string());
        }

        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, self.top_k
            ));
        }

        if !self.frame_interval_seconds.is_finite() || self.frame_interval_seconds <= 0.0 {
            return Err(format!(
                "Frame interval must be a positive number of seconds, got {}",
                self.frame_interval_seconds
            ));
        }

        if let Some(threshold) = self.relevance_threshold {
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(format!(
                    "Relevance threshold must be within [0, 1], got {}",
                    threshold
                ));
            }
        }

        Ok(())
    }
}

/// Outcome of one search over one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport<I> {
    pub search_id: SearchId,

    /// Video that was searched
    pub video_id: String,

    pub query: String,

    pub mode: SearchMode,

    /// Frames produced by the sampler
    pub frames_sampled: usize,

    /// Frames the scorer returned a relevance for
    pub frames_scored: usize,

    /// Frames dropped because scoring failed
    pub frames_failed: usize,

    /// Matching segments in chronological order
    pub segments: Vec<Segment<I>>,

    /// Wall-clock time spent on the search
    pub response_time_ms: u64,

    pub created_at: DateTime<Utc>,
}

impl<I> SearchReport<I> {
    /// Number of segments returned.
    pub fn results_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether the search found nothing.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
