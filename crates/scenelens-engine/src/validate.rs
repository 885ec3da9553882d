//! Input precondition checks.
//!
//! The engine never re-sorts or clamps its input: a violation means the
//! sampler/scorer pairing upstream is broken, so it fails fast instead.

use scenelens_models::ScoredFrame;

use crate::error::{EngineError, EngineResult};

/// Check that frames are strictly time-ordered with finite, in-range scores.
pub fn validate_frames<I>(frames: &[ScoredFrame<I>]) -> EngineResult<()> {
    let mut previous: Option<&ScoredFrame<I>> = None;

    for (position, frame) in frames.iter().enumerate() {
        if !frame.timestamp_seconds.is_finite() || frame.timestamp_seconds < 0.0 {
            return Err(EngineError::invalid_input(format!(
                "frame {} (position {}) has invalid timestamp {}",
                frame.frame_index, position, frame.timestamp_seconds
            )));
        }

        if !frame.relevance_score.is_finite() {
            return Err(EngineError::invalid_input(format!(
                "frame {} (position {}) has non-finite relevance score",
                frame.frame_index, position
            )));
        }

        if !(0.0..=1.0).contains(&frame.relevance_score) {
            return Err(EngineError::invalid_input(format!(
                "frame {} (position {}) has relevance score {} outside [0, 1]",
                frame.frame_index, position, frame.relevance_score
            )));
        }

        if let Some(prev) = previous {
            if frame.timestamp_seconds <= prev.timestamp_seconds {
                return Err(EngineError::invalid_input(format!(
                    "frames not sorted by timestamp: {}s at position {} follows {}s",
                    frame.timestamp_seconds,
                    position,
                    prev.timestamp_seconds
                )));
            }
        }

        previous = Some(frame);
    }

    Ok(())
}

/// Check that a relevance threshold is usable.
pub fn validate_threshold(threshold: f64) -> EngineResult<()> {
    if threshold.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_input(format!(
            "relevance threshold must be finite, got {}",
            threshold
        )))
    }
}
