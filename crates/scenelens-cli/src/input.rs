//! Reading frame records and policies from disk or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use scenelens_engine::SegmentationPolicy;
use scenelens_models::{keyframe_file_name, ScoredFrame};
use serde::{Deserialize, Serialize};

/// One scored frame as exchanged with other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub relevance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframe_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl FrameRecord {
    /// Convert into a scored frame whose image handle is the keyframe path.
    ///
    /// A record without a path gets the conventional keyframe file name.
    pub fn into_scored(self) -> ScoredFrame<String> {
        let keyframe = self.keyframe_path.unwrap_or_else(|| {
            keyframe_file_name(self.frame_index, self.timestamp_seconds, "query")
        });
        let mut frame = ScoredFrame::new(
            self.frame_index,
            self.timestamp_seconds,
            self.relevance_score,
            keyframe,
        );
        frame.caption = self.caption;
        frame
    }
}

/// Parse a JSON array of frame records.
pub fn parse_records(json: &str) -> Result<Vec<FrameRecord>> {
    serde_json::from_str(json).context("Frames must be a JSON array of frame records")
}

/// Read frame records from `source`, or stdin when it is `-`.
pub fn read_records(source: &str) -> Result<Vec<FrameRecord>> {
    let json = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read frames from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read frames from {}", source))?
    };

    parse_records(&json)
}

/// Load a policy from a JSON file, or from the environment without one.
///
/// Fields missing from the file keep their defaults.
pub fn load_policy(path: Option<&Path>) -> Result<SegmentationPolicy> {
    let policy = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy from {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid policy in {}", path.display()))?
        }
        None => SegmentationPolicy::from_env(),
    };

    policy.validate()?;
    Ok(policy)
}
