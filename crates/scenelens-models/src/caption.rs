//! Segment caption formatting.
//!
//! Display code parses these strings, so the layout is fixed:
//! - with a source description: `"{description} ({start:.1}s-{end:.1}s, {duration:.1}s duration)"`
//! - without one: `"Content from {start:.1}s to {end:.1}s ({duration:.1}s duration)"`

/// Build the caption for a segment spanning `start..=end` seconds.
///
/// A description that is empty after trimming counts as absent.
pub fn segment_caption(description: Option<&str>, start: f64, end: f64) -> String {
    let duration = end - start;

    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!(
            "{} ({:.1}s-{:.1}s, {:.1}s duration)",
            description, start, end, duration
        ),
        None => format!(
            "Content from {:.1}s to {:.1}s ({:.1}s duration)",
            start, end, duration
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_with_description() {
        let caption = segment_caption(Some("A dog running on grass"), 2.0, 5.5);
        assert_eq!(caption, "A dog running on grass (2.0s-5.5s, 3.5s duration)");
    }

    #[test]
    fn test_caption_fallback() {
        let caption = segment_caption(None, 0.0, 1.0);
        assert_eq!(caption, "Content from 0.0s to 1.0s (1.0s duration)");
    }

    #[test]
    fn test_blank_description_uses_fallback() {
        let caption = segment_caption(Some("   "), 10.0, 12.0);
        assert_eq!(caption, "Content from 10.0s to 12.0s (2.0s duration)");
    }

    #[test]
    fn test_description_is_trimmed() {
        let caption = segment_caption(Some("  a red car \n"), 1.0, 3.0);
        assert_eq!(caption, "a red car (1.0s-3.0s, 2.0s duration)");
    }
}
