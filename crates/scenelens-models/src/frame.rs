//! Sampled and scored frames.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use image::RgbImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One sampled instant of a video, scored against a query.
///
/// `I` is the caller-owned handle to the frame's pixels. The engine never
/// decodes or mutates it; it only clones the handle of the frame it picks
/// as a segment's representative, so `I` should be cheap to clone
/// (an `Arc` or a path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredFrame<I> {
    /// Index of the frame in the decoded stream
    pub frame_index: u64,

    /// Presentation time in seconds
    pub timestamp_seconds: f64,

    /// Relevance to the query in [0, 1]
    pub relevance_score: f64,

    /// Handle to the frame's pixels
    pub representative_image: I,

    /// Optional text description of the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl<I> ScoredFrame<I> {
    /// Create a scored frame without a caption.
    pub fn new(frame_index: u64, timestamp_seconds: f64, relevance_score: f64, image: I) -> Self {
        Self {
            frame_index,
            timestamp_seconds,
            relevance_score,
            representative_image: image,
            caption: None,
        }
    }

    /// Attach a caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Read-only, cheaply clonable handle to decoded RGB pixels.
#[derive(Clone)]
pub struct FrameImage(Arc<RgbImage>);

impl FrameImage {
    pub fn new(image: RgbImage) -> Self {
        Self(Arc::new(image))
    }

    /// Whether two handles point at the same pixel buffer.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for FrameImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<RgbImage> for FrameImage {
    fn from(image: RgbImage) -> Self {
        Self::new(image)
    }
}

impl fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameImage")
            .field("width", &self.0.width())
            .field("height", &self.0.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_frame_with_caption() {
        let frame = ScoredFrame::new(12, 0.5, 0.8, "frame.jpg".to_string()).with_caption("a cat");
        assert_eq!(frame.frame_index, 12);
        assert_eq!(frame.caption.as_deref(), Some("a cat"));
    }

    #[test]
    fn test_scored_frame_deserialize_without_caption() {
        let json = r#"{"frame_index":3,"timestamp_seconds":1.5,"relevance_score":0.4,"representative_image":"k.jpg"}"#;
        let frame: ScoredFrame<String> = serde_json::from_str(json).unwrap();
        assert_eq!(frame.timestamp_seconds, 1.5);
        assert!(frame.caption.is_none());
    }

    #[test]
    fn test_frame_image_clone_shares_pixels() {
        let image = FrameImage::new(RgbImage::new(4, 2));
        let clone = image.clone();
        assert!(FrameImage::ptr_eq(&image, &clone));
        assert_eq!(clone.width(), 4);
        assert_eq!(format!("{:?}", clone), "FrameImage { width: 4, height: 2 }");
    }
}
