//! Boundary detection.
//!
//! Partitions time-ordered scored frames into regions of continuous
//! matching content. The rule is adaptive: confident neighbourhoods
//! tolerate larger sampling gaps, and a sharp score jump always starts a
//! new region.

use scenelens_models::ScoredFrame;
use tracing::debug;

use crate::config::SegmentationPolicy;

/// A non-empty, time-ordered run of frames believed to show one piece of
/// matching content. Borrows from the caller's frames and never outlives
/// the segmentation call.
#[derive(Debug)]
pub struct Region<'a, I> {
    frames: Vec<&'a ScoredFrame<I>>,
}

impl<'a, I> Region<'a, I> {
    fn start(frame: &'a ScoredFrame<I>) -> Self {
        Self { frames: vec![frame] }
    }

    pub fn frames(&self) -> &[&'a ScoredFrame<I>] {
        &self.frames
    }

    pub fn first(&self) -> &'a ScoredFrame<I> {
        self.frames[0]
    }

    pub fn last(&self) -> &'a ScoredFrame<I> {
        self.frames[self.frames.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; regions hold at least one frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether `next` continues this region.
    fn accepts(&self, next: &ScoredFrame<I>, policy: &SegmentationPolicy) -> bool {
        let last = self.last();
        let time_gap = next.timestamp_seconds - last.timestamp_seconds;
        let max_gap = policy.max_gap_for(next.relevance_score, last.relevance_score);
        let score_diff = (next.relevance_score - last.relevance_score).abs();

        time_gap <= max_gap && score_diff <= policy.max_score_diff
    }
}

/// Split `frames` into regions.
///
/// Frames scoring at or below `relevance_threshold` are dropped first; if
/// none remain the result is empty. Regions come out in chronological
/// order. `frames` must already be sorted by timestamp.
pub fn detect_regions<'a, I>(
    frames: &'a [ScoredFrame<I>],
    relevance_threshold: f64,
    policy: &SegmentationPolicy,
) -> Vec<Region<'a, I>> {
    let mut relevant = frames
        .iter()
        .filter(|frame| frame.relevance_score > relevance_threshold);

    let Some(first) = relevant.next() else {
        debug!(
            frames = frames.len(),
            relevance_threshold, "No frames above relevance threshold"
        );
        return Vec::new();
    };

    let mut regions = Vec::new();
    let mut current = Region::start(first);

    for frame in relevant {
        if current.accepts(frame, policy) {
            current.frames.push(frame);
        } else {
            regions.push(std::mem::replace(&mut current, Region::start(frame)));
        }
    }
    regions.push(current);

    debug!(
        frames = frames.len(),
        regions = regions.len(),
        relevance_threshold,
        "Boundary detection complete"
    );

    regions
}
