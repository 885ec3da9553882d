//! Frame sampling.
//!
//! [`SamplingPlan`] maps a sampling interval onto frame indices of a
//! constant-rate video. [`MemorySampler`] applies it to videos whose
//! frames are already decoded.

use std::collections::HashMap;

use async_trait::async_trait;
use scenelens_models::VideoRef;
use tracing::{debug, warn};

use crate::collaborators::{CollaboratorResult, FrameSampler, SampledFrame};

/// Frame rate assumed when a video reports none.
pub const FALLBACK_FPS: f64 = 30.0;

/// Which frames of a video to sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    fps: f64,
    step: u64,
}

impl SamplingPlan {
    /// Plan sampling every `interval_seconds` of a video at `fps`.
    ///
    /// A missing or nonsensical frame rate falls back to 30 fps. At least
    /// every frame is sampled, however small the interval.
    pub fn new(fps: f64, interval_seconds: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            warn!(fps, fallback = FALLBACK_FPS, "Invalid frame rate, using fallback");
            FALLBACK_FPS
        };

        let raw_step = (fps * interval_seconds).floor();
        let step = if raw_step.is_finite() && raw_step >= 1.0 {
            raw_step as u64
        } else {
            1
        };

        Self { fps, step }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Distance between sampled frames, in frames.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn should_sample(&self, frame_index: u64) -> bool {
        frame_index % self.step == 0
    }

    /// Presentation time of `frame_index`, in seconds.
    pub fn timestamp(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps
    }

    /// Sampled indices of a video with `total_frames` frames.
    pub fn indices(&self, total_frames: u64) -> impl Iterator<Item = u64> {
        (0..total_frames).step_by(self.step as usize)
    }
}

/// An already-decoded video.
#[derive(Debug, Clone)]
pub struct MemoryVideo<I> {
    pub fps: f64,
    pub frames: Vec<I>,
}

impl<I> MemoryVideo<I> {
    pub fn new(fps: f64, frames: Vec<I>) -> Self {
        Self { fps, frames }
    }
}

/// Sampler over videos held in memory, looked up by video id.
#[derive(Debug, Clone)]
pub struct MemorySampler<I> {
    videos: HashMap<String, MemoryVideo<I>>,
}

impl<I> Default for MemorySampler<I> {
    fn default() -> Self {
        Self {
            videos: HashMap::new(),
        }
    }
}

impl<I> MemorySampler<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a video under `video_id`, replacing any previous one.
    pub fn insert(&mut self, video_id: impl Into<String>, video: MemoryVideo<I>) {
        self.videos.insert(video_id.into(), video);
    }

    pub fn with_video(mut self, video_id: impl Into<String>, video: MemoryVideo<I>) -> Self {
        self.insert(video_id, video);
        self
    }
}

#[async_trait]
impl<I: Clone + Send + Sync> FrameSampler<I> for MemorySampler<I> {
    async fn sample_frames(
        &self,
        video: &VideoRef,
        interval_seconds: f64,
    ) -> CollaboratorResult<Vec<SampledFrame<I>>> {
        let source = self
            .videos
            .get(&video.id)
            .ok_or_else(|| format!("Video not found: {}", video.id))?;

        let plan = SamplingPlan::new(source.fps, interval_seconds);
        let frames: Vec<SampledFrame<I>> = plan
            .indices(source.frames.len() as u64)
            .map(|index| {
                SampledFrame::new(
                    index,
                    plan.timestamp(index),
                    source.frames[index as usize].clone(),
                )
            })
            .collect();

        debug!(
            video_id = %video.id,
            total_frames = source.frames.len(),
            sampled = frames.len(),
            step = plan.step(),
            "Sampled frames"
        );

        Ok(frames)
    }
}
