//! Region-to-segment reduction.

use scenelens_models::{ScoredFrame, Segment};
use tracing::trace;

use crate::boundary::Region;
use crate::config::SegmentationPolicy;

/// Collapse a region into one segment.
///
/// The span runs from the first to the last frame, widened to the policy's
/// minimum duration for single-instant regions. The score is the mean
/// relevance, so one spurious outlier cannot dominate. The representative
/// is the highest-scoring frame, earliest on ties.
pub fn reduce_region<I: Clone>(
    region: &Region<'_, I>,
    query: &str,
    policy: &SegmentationPolicy,
) -> Segment<I> {
    let first = region.first();
    let start_time = first.timestamp_seconds;
    let mut end_time = region.last().timestamp_seconds;
    if end_time == start_time {
        end_time = start_time + policy.min_segment_duration_seconds;
    }

    let frames = region.frames();
    let score = frames.iter().map(|f| f.relevance_score).sum::<f64>() / frames.len() as f64;
    let representative = best_frame(frames);

    trace!(
        query,
        start_time,
        end_time,
        score,
        representative = representative.frame_index,
        "Reduced region"
    );

    Segment::from_representative(representative, start_time, end_time, first.frame_index, score)
}

fn best_frame<'a, I>(frames: &[&'a ScoredFrame<I>]) -> &'a ScoredFrame<I> {
    let mut best = frames[0];
    for &frame in &frames[1..] {
        if frame.relevance_score > best.relevance_score {
            best = frame;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::detect_regions;

    fn frames(points: &[(f64, f64)]) -> Vec<ScoredFrame<String>> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(ts, score))| ScoredFrame::new(i as u64 * 15, ts, score, format!("img{}", i)))
            .collect()
    }

    fn reduce_all(input: &[ScoredFrame<String>]) -> Vec<Segment<String>> {
        let policy = SegmentationPolicy::default();
        detect_regions(input, 0.25, &policy)
            .iter()
            .map(|r| reduce_region(r, "query", &policy))
            .collect()
    }

    #[test]
    fn test_span_and_mean_score() {
        let segments = reduce_all(&frames(&[(0.0, 0.6), (0.5, 0.65), (1.0, 0.7)]));
        assert_eq!(segments.len(), 1);

        let segment = &segments[0];
        assert_eq!(segment.start_time_seconds, 0.0);
        assert_eq!(segment.end_time_seconds, 1.0);
        assert_eq!(segment.start_frame_index, 0);
        assert!((segment.score - 0.65).abs() < 1e-9);
        assert_eq!(segment.representative_image, "img2");
        assert_eq!(segment.representative_frame_index, 30);
    }

    #[test]
    fn test_single_frame_region_is_widened() {
        let segments = reduce_all(&frames(&[(3.0, 0.8)]));
        assert_eq!(segments[0].start_time_seconds, 3.0);
        assert_eq!(segments[0].end_time_seconds, 4.0);
        assert_eq!(segments[0].caption, "Content from 3.0s to 4.0s (1.0s duration)");
    }

    #[test]
    fn test_tie_picks_earliest_frame() {
        let segments = reduce_all(&frames(&[(0.0, 0.7), (0.5, 0.7), (1.0, 0.6)]));
        assert_eq!(segments[0].representative_image, "img0");
    }

    #[test]
    fn test_caption_uses_representative_description() {
        let mut input = frames(&[(0.0, 0.6), (0.5, 0.9)]);
        input[0].caption = Some("a blurry frame".to_string());
        input[1].caption = Some("a person on a bicycle".to_string());

        let segments = reduce_all(&input);
        assert_eq!(
            segments[0].caption,
            "a person on a bicycle (0.0s-0.5s, 0.5s duration)"
        );
    }

    #[test]
    fn test_missing_representative_caption_falls_back() {
        let mut input = frames(&[(2.0, 0.9), (2.5, 0.6)]);
        input[1].caption = Some("not the representative".to_string());

        let segments = reduce_all(&input);
        assert_eq!(segments[0].caption, "Content from 2.0s to 2.5s (0.5s duration)");
    }
}
