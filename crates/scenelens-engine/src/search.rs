//! Video search orchestration.
//!
//! Runs one query against one video: sample, score, optionally cap the
//! candidates for a preview, then segment. The sampler and scorer are
//! injected; nothing here is process-global.

use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use scenelens_models::{ScoredFrame, SearchId, SearchMode, SearchReport, SearchRequest, Segment, VideoRef};
use tracing::{debug, Instrument};

use crate::collaborators::{FrameSampler, RelevanceScorer};
use crate::engine::SegmentationEngine;
use crate::error::{EngineError, EngineResult};
use crate::logging::SearchLogger;
use crate::metrics;

/// Orchestrator tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Frames scored concurrently (default: 4)
    pub max_concurrent_scoring: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_concurrent_scoring: 4,
        }
    }
}

impl SearchOptions {
    /// Create options from environment variables.
    pub fn from_env() -> Self {
        let max_concurrent_scoring = std::env::var("SCENELENS_MAX_CONCURRENT_SCORING")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4);

        Self {
            max_concurrent_scoring,
        }
    }
}

/// What a search produced before it is wrapped into a report.
struct SearchOutcome<I> {
    frames_sampled: usize,
    frames_scored: usize,
    frames_failed: usize,
    segments: Vec<Segment<I>>,
}

/// Searches videos with an injected frame sampler and relevance scorer.
pub struct VideoSearch<S, R> {
    sampler: S,
    scorer: R,
    engine: SegmentationEngine,
    options: SearchOptions,
}

impl<S, R> VideoSearch<S, R> {
    pub fn new(sampler: S, scorer: R, engine: SegmentationEngine) -> Self {
        Self {
            sampler,
            scorer,
            engine,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &SegmentationEngine {
        &self.engine
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Run `request` against `video`.
    ///
    /// Segments come back in chronological order, at most `top_k` of them.
    /// A video yielding no frames produces an empty report; a video whose
    /// frames all fail to score is an error.
    pub async fn search<I>(
        &self,
        video: &VideoRef,
        request: &SearchRequest,
    ) -> EngineResult<SearchReport<I>>
    where
        I: Clone + Send + Sync,
        S: FrameSampler<I>,
        R: RelevanceScorer<I>,
    {
        request.validate().map_err(EngineError::InvalidRequest)?;

        let started = Instant::now();
        let search_id = SearchId::new();
        let logger = SearchLogger::new(&search_id, &request.query);
        let mode = request.mode;

        logger.log_start(&format!("video {} ({} mode)", video.id, mode));

        let result = self
            .run(video, request, &logger)
            .instrument(logger.create_span())
            .await;

        let elapsed = started.elapsed();

        match result {
            Ok(outcome) => {
                metrics::record_search(mode.as_str(), "success", elapsed.as_secs_f64());
                metrics::record_segments_returned(mode.as_str(), outcome.segments.len());
                logger.log_completion(&format!(
                    "{} segments in {}ms",
                    outcome.segments.len(),
                    elapsed.as_millis()
                ));

                Ok(SearchReport {
                    search_id,
                    video_id: video.id.clone(),
                    query: request.query.clone(),
                    mode,
                    frames_sampled: outcome.frames_sampled,
                    frames_scored: outcome.frames_scored,
                    frames_failed: outcome.frames_failed,
                    segments: outcome.segments,
                    response_time_ms: elapsed.as_millis() as u64,
                    created_at: Utc::now(),
                })
            }
            Err(e) => {
                metrics::record_search(mode.as_str(), "error", elapsed.as_secs_f64());
                logger.log_warning(&format!("search failed: {}", e));
                Err(e)
            }
        }
    }

    async fn run<I>(
        &self,
        video: &VideoRef,
        request: &SearchRequest,
        logger: &SearchLogger,
    ) -> EngineResult<SearchOutcome<I>>
    where
        I: Clone + Send + Sync,
        S: FrameSampler<I>,
        R: RelevanceScorer<I>,
    {
        let sampled = self
            .sampler
            .sample_frames(video, request.frame_interval_seconds)
            .await
            .map_err(EngineError::Sampling)?;
        let frames_sampled = sampled.len();

        if sampled.is_empty() {
            logger.log_warning("sampler produced no frames");
            return Ok(SearchOutcome {
                frames_sampled: 0,
                frames_scored: 0,
                frames_failed: 0,
                segments: Vec::new(),
            });
        }

        logger.log_progress(&format!("scoring {} frames", frames_sampled));

        let scorer = &self.scorer;
        let query = request.query.as_str();
        let results: Vec<_> = stream::iter(sampled)
            .map(move |frame| async move {
                let relevance = scorer.score(&frame.image, query).await;
                (frame, relevance)
            })
            .buffer_unordered(self.options.max_concurrent_scoring.max(1))
            .collect()
            .await;

        let mut scored: Vec<ScoredFrame<I>> = Vec::with_capacity(results.len());
        let mut frames_failed = 0;

        for (frame, relevance) in results {
            match relevance {
                Ok(relevance) if relevance.score.is_finite() && (0.0..=1.0).contains(&relevance.score) => {
                    let mut scored_frame = ScoredFrame::new(
                        frame.frame_index,
                        frame.timestamp_seconds,
                        relevance.score,
                        frame.image,
                    );
                    scored_frame.caption = relevance.caption;
                    scored.push(scored_frame);
                }
                Ok(relevance) => {
                    frames_failed += 1;
                    logger.log_warning(&format!(
                        "frame {} scored out of range: {}",
                        frame.frame_index, relevance.score
                    ));
                }
                Err(e) => {
                    frames_failed += 1;
                    logger.log_warning(&format!(
                        "failed to score frame {}: {}",
                        frame.frame_index, e
                    ));
                }
            }
        }

        metrics::record_frames_scored(scored.len(), frames_failed);

        if scored.is_empty() {
            return Err(EngineError::NoFramesScored {
                sampled: frames_sampled,
            });
        }
        let frames_scored = scored.len();

        let candidates = match request.mode {
            SearchMode::Segments => {
                scored.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
                scored
            }
            SearchMode::Preview => {
                scored.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
                let mut selected: Vec<ScoredFrame<I>> = self
                    .engine
                    .select_diverse(&scored, request.top_k)
                    .into_iter()
                    .cloned()
                    .collect();
                selected.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
                debug!(
                    scored = frames_scored,
                    candidates = selected.len(),
                    "Preview candidates selected"
                );
                selected
            }
        };

        let threshold = request
            .relevance_threshold
            .unwrap_or(self.engine.policy().relevance_threshold);
        let mut segments = self
            .engine
            .segment_with_threshold(&candidates, &request.query, threshold)?;

        if segments.len() > request.top_k {
            segments.sort_by(|a, b| b.score.total_cmp(&a.score));
            segments.truncate(request.top_k);
            segments.sort_by(|a, b| a.start_time_seconds.total_cmp(&b.start_time_seconds));
        }

        Ok(SearchOutcome {
            frames_sampled,
            frames_scored,
            frames_failed,
            segments,
        })
    }
}
