//! External collaborators of a search.
//!
//! The engine never decodes video or runs a model itself. A frame sampler
//! and a relevance scorer are injected into [`crate::VideoSearch`]; any
//! implementation (an in-memory sampler, an HTTP model client) plugs in
//! here.

use async_trait::async_trait;
use scenelens_models::VideoRef;

/// Error raised by a collaborator. Kept opaque so implementations can use
/// their own error types.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// A decoded frame produced by a sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame<I> {
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub image: I,
}

impl<I> SampledFrame<I> {
    pub fn new(frame_index: u64, timestamp_seconds: f64, image: I) -> Self {
        Self {
            frame_index,
            timestamp_seconds,
            image,
        }
    }
}

/// Relevance of one frame to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    /// Score in [0, 1]
    pub score: f64,

    /// Free-text description produced alongside the score, if any
    pub caption: Option<String>,
}

impl Relevance {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Produces frames of a video at a fixed interval.
#[async_trait]
pub trait FrameSampler<I: Send + Sync>: Send + Sync {
    /// Sample `video` every `interval_seconds`.
    ///
    /// Frames must come back in strictly increasing timestamp order.
    async fn sample_frames(
        &self,
        video: &VideoRef,
        interval_seconds: f64,
    ) -> CollaboratorResult<Vec<SampledFrame<I>>>;
}

/// Scores a frame against a free-text query.
#[async_trait]
pub trait RelevanceScorer<I: Send + Sync>: Send + Sync {
    async fn score(&self, image: &I, query: &str) -> CollaboratorResult<Relevance>;
}
