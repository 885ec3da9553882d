//! Search metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is up to
//! the embedding application.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const SEARCHES_TOTAL: &str = "scenelens_searches_total";
    pub const SEARCH_LATENCY_SECONDS: &str = "scenelens_search_latency_seconds";
    pub const FRAMES_SCORED_TOTAL: &str = "scenelens_frames_scored_total";
    pub const FRAME_SCORE_FAILURES_TOTAL: &str = "scenelens_frame_score_failures_total";
    pub const SEGMENTS_RETURNED_TOTAL: &str = "scenelens_segments_returned_total";
}

/// Record a finished search.
pub fn record_search(mode: &str, status: &str, duration_secs: f64) {
    let labels = [("mode", mode.to_string()), ("status", status.to_string())];
    counter!(names::SEARCHES_TOTAL, &labels).increment(1);

    let labels = [("mode", mode.to_string())];
    histogram!(names::SEARCH_LATENCY_SECONDS, &labels).record(duration_secs);
}

/// Record frames scored successfully and frames whose scoring failed.
pub fn record_frames_scored(scored: usize, failed: usize) {
    counter!(names::FRAMES_SCORED_TOTAL).increment(scored as u64);
    if failed > 0 {
        counter!(names::FRAME_SCORE_FAILURES_TOTAL).increment(failed as u64);
    }
}

/// Record segments returned to the caller.
pub fn record_segments_returned(mode: &str, count: usize) {
    let labels = [("mode", mode.to_string())];
    counter!(names::SEGMENTS_RETURNED_TOTAL, &labels).increment(count as u64);
}
