//! Temporal segmentation engine for query-driven video search.
//!
//! Given frames sampled from a video and scored against a free-text query,
//! the engine emits a small set of time segments that match the query:
//!
//! 1. Boundary detection splits relevant frames into regions
//! 2. Each region is reduced to one segment
//! 3. Adjacent segments are merged, confidence buying temporal slack
//! 4. Segments trailing the best match by too much are filtered out
//!
//! The stages are pure and synchronous. [`VideoSearch`] wires them to an
//! injected [`FrameSampler`] and [`RelevanceScorer`].

pub mod boundary;
pub mod collaborators;
pub mod config;
pub mod diverse;
pub mod engine;
pub mod error;
pub mod logging;
pub mod merge;
pub mod metrics;
pub mod quality;
pub mod reduce;
pub mod sampling;
pub mod search;
pub mod validate;

pub use collaborators::{
    CollaboratorError, CollaboratorResult, FrameSampler, Relevance, RelevanceScorer, SampledFrame,
};
pub use config::SegmentationPolicy;
pub use engine::{segment, select_diverse, SegmentationEngine};
pub use error::{EngineError, EngineResult};
pub use logging::SearchLogger;
pub use sampling::{MemorySampler, MemoryVideo, SamplingPlan};
pub use search::{SearchOptions, VideoSearch};
