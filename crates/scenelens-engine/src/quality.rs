//! Quality filtering.

use scenelens_models::Segment;
use tracing::debug;

use crate::config::SegmentationPolicy;

/// Drop segments that trail the best one by too much.
///
/// The acceptance band is `max(quality_floor, best * quality_ratio)`. A
/// non-empty input never yields an empty output: if nothing clears the
/// band, the single best segment is kept.
pub fn filter_segments<I>(
    segments: Vec<Segment<I>>,
    policy: &SegmentationPolicy,
) -> Vec<Segment<I>> {
    let Some(best_score) = segments.iter().map(|s| s.score).reduce(f64::max) else {
        return segments;
    };

    let threshold = policy.quality_threshold_for(best_score);
    let input_len = segments.len();

    let mut best_position = 0;
    for (position, segment) in segments.iter().enumerate() {
        if segment.score > segments[best_position].score {
            best_position = position;
        }
    }

    let filtered: Vec<Segment<I>> = if segments.iter().any(|s| s.score >= threshold) {
        segments
            .into_iter()
            .filter(|s| s.score >= threshold)
            .collect()
    } else {
        segments.into_iter().nth(best_position).into_iter().collect()
    };

    debug!(
        input = input_len,
        output = filtered.len(),
        best_score,
        threshold,
        "Quality filter complete"
    );

    filtered
}
