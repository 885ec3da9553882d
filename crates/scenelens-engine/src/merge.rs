//! Segment merging.
//!
//! Adjacent segments whose gap is small relative to their combined
//! confidence are fused into one: confidence buys temporal slack.

use scenelens_models::Segment;
use tracing::debug;

use crate::config::SegmentationPolicy;

/// Merge adjacent segments.
///
/// `segments` must be sorted by start time. The output keeps chronological
/// order, is never longer than the input, and contains no overlapping
/// spans. A merged segment keeps the higher-scoring representative (and
/// its score); its caption always reflects the widened span.
///
/// Passes repeat until one merges nothing, since a segment that takes over
/// a higher score may now reach its already-emitted predecessor. The
/// result is therefore a fixed point: merging it again changes nothing.
pub fn merge_segments<I: Clone>(
    segments: Vec<Segment<I>>,
    policy: &SegmentationPolicy,
) -> Vec<Segment<I>> {
    let input_len = segments.len();
    let mut merged = segments;
    let mut passes = 0;

    loop {
        let before = merged.len();
        merged = merge_pass(merged, policy);
        passes += 1;
        if merged.len() == before {
            break;
        }
    }

    debug!(
        input = input_len,
        output = merged.len(),
        passes,
        "Segment merge complete"
    );

    merged
}

fn merge_pass<I: Clone>(
    segments: Vec<Segment<I>>,
    policy: &SegmentationPolicy,
) -> Vec<Segment<I>> {
    let mut output = Vec::with_capacity(segments.len());
    let mut iter = segments.into_iter();
    let Some(mut current) = iter.next() else {
        return output;
    };

    for next in iter {
        let gap = next.start_time_seconds - current.end_time_seconds;
        let dynamic_threshold = policy.merge_gap_for(current.score, next.score);

        if gap <= dynamic_threshold {
            current.end_time_seconds = current.end_time_seconds.max(next.end_time_seconds);
            if next.score > current.score {
                current.adopt_representative(&next);
            } else {
                current.refresh_caption();
            }
        } else {
            output.push(std::mem::replace(&mut current, next));
        }
    }
    output.push(current);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelens_models::ScoredFrame;

    fn segment(start: f64, end: f64, score: f64, caption: Option<&str>) -> Segment<String> {
        let mut rep = ScoredFrame::new(
            (start * 30.0) as u64,
            start,
            score,
            format!("img@{}", start),
        );
        rep.caption = caption.map(str::to_string);
        Segment::from_representative(&rep, start, end, rep.frame_index, score)
    }

    #[test]
    fn test_empty() {
        let merged = merge_segments::<String>(Vec::new(), &SegmentationPolicy::default());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_close_segments_merge() {
        // gap 1.5 <= 1.5 + 0.5
        let merged = merge_segments(
            vec![segment(0.0, 1.0, 0.5, None), segment(2.5, 3.0, 0.5, None)],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start_time_seconds, 0.0);
        assert_eq!(merged[0].end_time_seconds, 3.0);
        assert_eq!(merged[0].caption, "Content from 0.0s to 3.0s (3.0s duration)");
    }

    #[test]
    fn test_distant_segments_stay_apart() {
        // gap 4.5 > 2.0
        let merged = merge_segments(
            vec![segment(0.0, 0.5, 0.5, None), segment(5.0, 5.5, 0.5, None)],
            &SegmentationPolicy::default(),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_confidence_widens_merge_gap() {
        // gap 2.3: merged at avg 0.9 (threshold 2.4), not at avg 0.5 (threshold 2.0)
        let policy = SegmentationPolicy::default();
        let confident = merge_segments(
            vec![segment(0.0, 1.0, 0.9, None), segment(3.3, 4.0, 0.9, None)],
            &policy,
        );
        let weak = merge_segments(
            vec![segment(0.0, 1.0, 0.5, None), segment(3.3, 4.0, 0.5, None)],
            &policy,
        );

        assert_eq!(confident.len(), 1);
        assert_eq!(weak.len(), 2);
    }

    #[test]
    fn test_higher_scoring_next_takes_over_representative() {
        let merged = merge_segments(
            vec![
                segment(0.0, 1.0, 0.5, Some("a dog")),
                segment(2.0, 3.0, 0.8, Some("a dog catching a frisbee")),
            ],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score, 0.8);
        assert_eq!(merged[0].representative_image, "img@2");
        assert_eq!(merged[0].start_frame_index, 0);
        assert_eq!(
            merged[0].caption,
            "a dog catching a frisbee (0.0s-3.0s, 3.0s duration)"
        );
    }

    #[test]
    fn test_lower_scoring_next_keeps_representative() {
        let merged = merge_segments(
            vec![
                segment(0.0, 1.0, 0.8, Some("a dog")),
                segment(2.0, 3.0, 0.5, Some("grass")),
            ],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged[0].score, 0.8);
        assert_eq!(merged[0].representative_image, "img@0");
        assert_eq!(merged[0].caption, "a dog (0.0s-3.0s, 3.0s duration)");
    }

    #[test]
    fn test_chain_merges_into_one() {
        let merged = merge_segments(
            vec![
                segment(0.0, 1.0, 0.6, None),
                segment(2.0, 3.0, 0.6, None),
                segment(4.0, 5.0, 0.6, None),
                segment(20.0, 21.0, 0.6, None),
            ],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].end_time_seconds, 5.0);
        assert_eq!(merged[1].start_time_seconds, 20.0);
    }

    #[test]
    fn test_overlapping_widened_segment_never_shrinks() {
        // Widened single-frame segment [0, 1] followed by a short region
        let merged = merge_segments(
            vec![segment(0.0, 1.0, 0.9, None), segment(0.3, 0.6, 0.4, None)],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end_time_seconds, 1.0);
    }

    #[test]
    fn test_raised_score_reaches_back() {
        // [0, 1] and [3, 3.5] at 0.4 are 2.0s apart (threshold 1.9). Once the
        // second takes over 1.0 from [4, 4.5], the threshold becomes 2.2.
        let merged = merge_segments(
            vec![
                segment(0.0, 1.0, 0.4, None),
                segment(3.0, 3.5, 0.4, None),
                segment(4.0, 4.5, 1.0, None),
            ],
            &SegmentationPolicy::default(),
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start_time_seconds, 0.0);
        assert_eq!(merged[0].end_time_seconds, 4.5);
        assert_eq!(merged[0].score, 1.0);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let policy = SegmentationPolicy::default();
        let once = merge_segments(
            vec![
                segment(0.0, 1.0, 0.4, None),
                segment(2.8, 3.0, 0.9, None),
                segment(5.6, 6.0, 0.4, None),
                segment(9.0, 9.5, 0.35, None),
            ],
            &policy,
        );
        let twice = merge_segments(once.clone(), &policy);
        assert_eq!(once, twice);
    }
}
