//! End-to-end segmentation.
//!
//! Composes boundary detection, region reduction, merging and quality
//! filtering, in that fixed order. The engine is pure: it holds only its
//! policy, performs no I/O and may be shared freely across threads.

use scenelens_models::{ScoredFrame, Segment};
use tracing::debug;

use crate::boundary::detect_regions;
use crate::config::SegmentationPolicy;
use crate::diverse;
use crate::error::EngineResult;
use crate::merge::merge_segments;
use crate::quality::filter_segments;
use crate::reduce::reduce_region;
use crate::validate::{validate_frames, validate_threshold};

/// Turns scored frames into query-matching segments.
#[derive(Debug, Clone, Default)]
pub struct SegmentationEngine {
    policy: SegmentationPolicy,
}

impl SegmentationEngine {
    /// Create an engine with a validated policy.
    pub fn new(policy: SegmentationPolicy) -> EngineResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &SegmentationPolicy {
        &self.policy
    }

    /// Segment `frames` using the policy's relevance threshold.
    pub fn segment<I: Clone>(
        &self,
        frames: &[ScoredFrame<I>],
        query: &str,
    ) -> EngineResult<Vec<Segment<I>>> {
        self.segment_with_threshold(frames, query, self.policy.relevance_threshold)
    }

    /// Segment `frames`, dropping those scoring at or below
    /// `relevance_threshold`.
    ///
    /// `frames` must be strictly ordered by timestamp with finite scores in
    /// [0, 1]; anything else is rejected with `InvalidInput`. No match is
    /// not an error: the result is simply empty.
    pub fn segment_with_threshold<I: Clone>(
        &self,
        frames: &[ScoredFrame<I>],
        query: &str,
        relevance_threshold: f64,
    ) -> EngineResult<Vec<Segment<I>>> {
        validate_threshold(relevance_threshold)?;
        validate_frames(frames)?;

        let regions = detect_regions(frames, relevance_threshold, &self.policy);
        if regions.is_empty() {
            debug!(query, frames = frames.len(), "No matching regions");
            return Ok(Vec::new());
        }

        let reduced: Vec<Segment<I>> = regions
            .iter()
            .map(|region| reduce_region(region, query, &self.policy))
            .collect();
        let region_count = reduced.len();

        let merged = merge_segments(reduced, &self.policy);
        let merged_count = merged.len();

        let segments = filter_segments(merged, &self.policy);

        debug!(
            query,
            frames = frames.len(),
            regions = region_count,
            merged = merged_count,
            segments = segments.len(),
            "Segmentation complete"
        );

        Ok(segments)
    }

    /// Select up to `k` temporally spread candidates.
    ///
    /// `candidates` must be sorted by score, highest first.
    pub fn select_diverse<'a, I>(
        &self,
        candidates: &'a [ScoredFrame<I>],
        k: usize,
    ) -> Vec<&'a ScoredFrame<I>> {
        diverse::select_diverse(candidates, k, self.policy.diversity_min_spacing_seconds)
    }
}

/// Segment `frames` with the default policy.
pub fn segment<I: Clone>(
    frames: &[ScoredFrame<I>],
    query: &str,
    relevance_threshold: f64,
) -> EngineResult<Vec<Segment<I>>> {
    SegmentationEngine::default().segment_with_threshold(frames, query, relevance_threshold)
}

/// Select up to `k` temporally spread candidates with the default spacing.
pub fn select_diverse<I>(candidates: &[ScoredFrame<I>], k: usize) -> Vec<&ScoredFrame<I>> {
    diverse::select_diverse(
        candidates,
        k,
        SegmentationPolicy::default().diversity_min_spacing_seconds,
    )
}
