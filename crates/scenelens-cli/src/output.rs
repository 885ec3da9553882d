//! JSON output.

use std::io::Write;

use anyhow::{Context, Result};
use scenelens_models::{keyframe_file_name, SearchReport, Segment};
use serde::Serialize;

/// Write `value` to stdout as JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write output")?;
    Ok(())
}

/// Replace pixel handles with the keyframe file name of each
/// representative frame, so segments can be serialized.
pub fn name_keyframes<I>(segment: Segment<I>, tag: &str) -> Segment<String> {
    Segment {
        start_time_seconds: segment.start_time_seconds,
        end_time_seconds: segment.end_time_seconds,
        start_frame_index: segment.start_frame_index,
        score: segment.score,
        representative_image: keyframe_file_name(
            segment.representative_frame_index,
            segment.representative_timestamp_seconds,
            tag,
        ),
        representative_frame_index: segment.representative_frame_index,
        representative_timestamp_seconds: segment.representative_timestamp_seconds,
        description: segment.description,
        caption: segment.caption,
    }
}

/// [`name_keyframes`] applied to every segment of a report.
pub fn report_with_keyframe_names<I>(report: SearchReport<I>, tag: &str) -> SearchReport<String> {
    SearchReport {
        search_id: report.search_id,
        video_id: report.video_id,
        query: report.query,
        mode: report.mode,
        frames_sampled: report.frames_sampled,
        frames_scored: report.frames_scored,
        frames_failed: report.frames_failed,
        segments: report
            .segments
            .into_iter()
            .map(|segment| name_keyframes(segment, tag))
            .collect(),
        response_time_ms: report.response_time_ms,
        created_at: report.created_at,
    }
}
