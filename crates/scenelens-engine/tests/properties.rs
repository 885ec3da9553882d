//! Property tests for the segmentation stages.

use proptest::prelude::*;
use scenelens_engine::boundary::detect_regions;
use scenelens_engine::diverse::select_diverse;
use scenelens_engine::merge::merge_segments;
use scenelens_engine::quality::filter_segments;
use scenelens_engine::reduce::reduce_region;
use scenelens_engine::{segment, SegmentationPolicy};
use scenelens_models::{ScoredFrame, Segment};

/// Time-ordered frames built from (gap since previous, score) pairs.
fn timeline() -> impl Strategy<Value = Vec<ScoredFrame<u64>>> {
    prop::collection::vec((0.05f64..3.0, 0.0f64..=1.0), 0..60).prop_map(|steps| {
        let mut ts = 0.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (gap, score))| {
                if i > 0 {
                    ts += gap;
                }
                ScoredFrame::new(i as u64, ts, score, i as u64)
            })
            .collect()
    })
}

fn reduced(frames: &[ScoredFrame<u64>], policy: &SegmentationPolicy) -> Vec<Segment<u64>> {
    detect_regions(frames, policy.relevance_threshold, policy)
        .iter()
        .map(|region| reduce_region(region, "query", policy))
        .collect()
}

proptest! {
    #[test]
    fn segments_are_ordered_and_disjoint(frames in timeline()) {
        let segments = segment(&frames, "query", 0.25).unwrap();

        for s in &segments {
            prop_assert!(s.start_time_seconds <= s.end_time_seconds);
        }
        for pair in segments.windows(2) {
            prop_assert!(pair[0].start_time_seconds <= pair[1].start_time_seconds);
            prop_assert!(pair[0].end_time_seconds <= pair[1].start_time_seconds);
        }
    }

    #[test]
    fn low_scores_never_form_segments(
        frames in timeline(),
        threshold in 0.0f64..1.0,
    ) {
        let capped: Vec<ScoredFrame<u64>> = frames
            .into_iter()
            .map(|mut f| {
                f.relevance_score = f.relevance_score.min(threshold);
                f
            })
            .collect();

        prop_assert!(segment(&capped, "query", threshold).unwrap().is_empty());
    }

    #[test]
    fn surviving_segments_reach_threshold(frames in timeline(), threshold in 0.0f64..1.0) {
        for s in segment(&frames, "query", threshold).unwrap() {
            prop_assert!(s.score >= threshold);
        }
    }

    #[test]
    fn merge_reaches_fixed_point(frames in timeline()) {
        let policy = SegmentationPolicy::default();
        let segments = reduced(&frames, &policy);
        let input_len = segments.len();

        let once = merge_segments(segments, &policy);
        prop_assert!(once.len() <= input_len);

        let twice = merge_segments(once.clone(), &policy);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn quality_filter_keeps_the_best(frames in timeline()) {
        let policy = SegmentationPolicy::default();
        let merged = merge_segments(reduced(&frames, &policy), &policy);
        let best = merged.iter().map(|s| s.score).fold(f64::NEG_INFINITY, f64::max);
        let was_empty = merged.is_empty();

        let filtered = filter_segments(merged, &policy);

        prop_assert_eq!(filtered.is_empty(), was_empty);
        if !was_empty {
            prop_assert!(filtered.iter().any(|s| s.score == best));
        }
    }

    #[test]
    fn diverse_selection_bound(
        mut candidates in prop::collection::vec((0.0f64..30.0, 0.0f64..=1.0), 0..40)
            .prop_map(|points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (ts, score))| ScoredFrame::new(i as u64, ts, score, ()))
                    .collect::<Vec<_>>()
            }),
        k in 0usize..20,
    ) {
        candidates.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        let spacing = 0.5;
        let selected = select_diverse(&candidates, k, spacing);

        prop_assert_eq!(selected.len(), k.min(candidates.len()));

        let crowded = selected.iter().enumerate().any(|(i, a)| {
            selected[i + 1..]
                .iter()
                .any(|b| (a.timestamp_seconds - b.timestamp_seconds).abs() < spacing)
        });
        if crowded {
            // Only allowed once every candidate sits near a selected frame
            for c in &candidates {
                let covered = selected.iter().any(|s| {
                    s.frame_index == c.frame_index
                        || (s.timestamp_seconds - c.timestamp_seconds).abs() < spacing
                });
                prop_assert!(covered);
            }
        }
    }
}
