//! Shared data models for SceneLens.
//!
//! This crate provides Serde-serializable types for:
//! - Scored frames produced by sampling and relevance scoring
//! - Segments emitted by the segmentation engine
//! - Caption formatting consumed by display code
//! - Search requests and reports

pub mod caption;
pub mod frame;
pub mod search;
pub mod segment;
pub mod video;

// Re-export common types
pub use caption::segment_caption;
pub use frame::{FrameImage, ScoredFrame};
pub use search::{SearchId, SearchMode, SearchReport, SearchRequest};
pub use segment::Segment;
pub use video::{keyframe_file_name, VideoRef};
