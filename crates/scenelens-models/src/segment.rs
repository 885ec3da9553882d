//! Segment model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::caption::segment_caption;
use crate::frame::ScoredFrame;

/// A time span of a video matching a query.
///
/// Segments are created from regions of scored frames, widened by the
/// merger, and are immutable once they leave the quality filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment<I> {
    /// Segment start (seconds)
    pub start_time_seconds: f64,

    /// Segment end (seconds), never before the start
    pub end_time_seconds: f64,

    /// Frame index of the first frame of the originating region
    pub start_frame_index: u64,

    /// Aggregate confidence
    pub score: f64,

    /// Image handle of the highest-scoring contributing frame
    pub representative_image: I,

    /// Frame index of the representative frame
    pub representative_frame_index: u64,

    /// Timestamp of the representative frame (seconds)
    pub representative_timestamp_seconds: f64,

    /// Source caption of the representative frame, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display caption covering the time span
    pub caption: String,
}

impl<I: Clone> Segment<I> {
    /// Create a segment represented by `representative`.
    pub fn from_representative(
        representative: &ScoredFrame<I>,
        start_time_seconds: f64,
        end_time_seconds: f64,
        start_frame_index: u64,
        score: f64,
    ) -> Self {
        let mut segment = Self {
            start_time_seconds,
            end_time_seconds,
            start_frame_index,
            score,
            representative_image: representative.representative_image.clone(),
            representative_frame_index: representative.frame_index,
            representative_timestamp_seconds: representative.timestamp_seconds,
            description: representative.caption.clone(),
            caption: String::new(),
        };
        segment.refresh_caption();
        segment
    }

    /// Take over `other`'s score and representative frame.
    ///
    /// The caption is regenerated for this segment's own time span.
    pub fn adopt_representative(&mut self, other: &Segment<I>) {
        self.score = other.score;
        self.representative_image = other.representative_image.clone();
        self.representative_frame_index = other.representative_frame_index;
        self.representative_timestamp_seconds = other.representative_timestamp_seconds;
        self.description = other.description.clone();
        self.refresh_caption();
    }
}

impl<I> Segment<I> {
    /// Length of the segment in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.end_time_seconds - self.start_time_seconds
    }

    /// Regenerate the caption from the description and current span.
    pub fn refresh_caption(&mut self) {
        self.caption = segment_caption(
            self.description.as_deref(),
            self.start_time_seconds,
            self.end_time_seconds,
        );
    }

    /// Whether the two spans share more than a boundary point.
    pub fn overlaps<J>(&self, other: &Segment<J>) -> bool {
        self.start_time_seconds < other.end_time_seconds
            && other.start_time_seconds < self.end_time_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64, ts: f64, score: f64) -> ScoredFrame<String> {
        ScoredFrame::new(index, ts, score, format!("frame_{}.jpg", index))
    }

    #[test]
    fn test_from_representative_builds_caption() {
        let rep = frame(15, 0.5, 0.9).with_caption("a goal celebration");
        let segment = Segment::from_representative(&rep, 0.0, 2.0, 0, 0.7);

        assert_eq!(segment.representative_frame_index, 15);
        assert_eq!(segment.representative_image, "frame_15.jpg");
        assert_eq!(segment.caption, "a goal celebration (0.0s-2.0s, 2.0s duration)");
        assert!((segment.duration_seconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_adopt_representative_keeps_span() {
        let mut first = Segment::from_representative(&frame(0, 0.0, 0.5), 0.0, 4.0, 0, 0.5);
        let second = Segment::from_representative(
            &frame(90, 3.0, 0.9).with_caption("a boat"),
            3.0,
            4.0,
            90,
            0.9,
        );

        first.adopt_representative(&second);

        assert_eq!(first.score, 0.9);
        assert_eq!(first.start_frame_index, 0);
        assert_eq!(first.representative_frame_index, 90);
        assert_eq!(first.caption, "a boat (0.0s-4.0s, 4.0s duration)");
    }

    #[test]
    fn test_overlaps() {
        let a = Segment::from_representative(&frame(0, 0.0, 0.5), 0.0, 2.0, 0, 0.5);
        let b = Segment::from_representative(&frame(1, 2.0, 0.5), 2.0, 3.0, 1, 0.5);
        let c = Segment::from_representative(&frame(2, 1.5, 0.5), 1.5, 3.0, 2, 0.5);

        assert!(!a.overlaps(&b), "touching spans do not overlap");
        assert!(a.overlaps(&c));
    }
}
