//! Video references and keyframe naming.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to a video a frame sampler can read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct VideoRef {
    /// Stable video identifier
    pub id: String,

    /// Where the sampler finds the video (path, object key, URL)
    pub location: String,
}

impl VideoRef {
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}

/// File name for a persisted keyframe.
///
/// Format: `frame_{index:06}_t{timestamp:.2}s_{tag}.jpg`, e.g.
/// `frame_000150_t5.00s_query.jpg`.
pub fn keyframe_file_name(frame_index: u64, timestamp_seconds: f64, tag: &str) -> String {
    format!(
        "frame_{:06}_t{:.2}s_{}.jpg",
        frame_index, timestamp_seconds, tag
    )
}
