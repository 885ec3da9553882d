//! Segmentation policy.
//!
//! Every threshold the engine applies is a named field here so the policy
//! can be tuned and tested independently of the mechanism.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Tunable heuristics for segmentation and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationPolicy {
    // === Boundary Detection ===
    /// Frames scoring at or below this are dropped (default: 0.25)
    pub relevance_threshold: f64,

    /// Neighbour score average strictly above which the wider gap applies (default: 0.3)
    pub confident_similarity: f64,

    /// Max gap between frames of a confident neighbourhood, seconds (default: 2.0)
    pub confident_max_gap_seconds: f64,

    /// Max gap between frames otherwise, seconds (default: 1.0)
    pub base_max_gap_seconds: f64,

    /// Max score jump between neighbours of one region (default: 0.4)
    pub max_score_diff: f64,

    // === Region Reduction ===
    /// Duration given to single-frame regions, seconds (default: 1.0)
    pub min_segment_duration_seconds: f64,

    // === Merging ===
    /// Gap always bridged between adjacent segments, seconds (default: 1.5)
    pub merge_base_gap_seconds: f64,

    /// Extra gap bridged per unit of average score, seconds (default: 1.0)
    pub merge_confidence_gap_seconds: f64,

    // === Quality Filter ===
    /// Absolute score floor (default: 0.3)
    pub quality_floor: f64,

    /// Fraction of the best score a segment must reach (default: 0.7)
    pub quality_ratio: f64,

    // === Diverse Selection ===
    /// Minimum spacing between diversely selected frames, seconds (default: 0.5)
    pub diversity_min_spacing_seconds: f64,
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.25,
            confident_similarity: 0.3,
            confident_max_gap_seconds: 2.0,
            base_max_gap_seconds: 1.0,
            max_score_diff: 0.4,
            min_segment_duration_seconds: 1.0,
            merge_base_gap_seconds: 1.5,
            merge_confidence_gap_seconds: 1.0,
            quality_floor: 0.3,
            quality_ratio: 0.7,
            diversity_min_spacing_seconds: 0.5,
        }
    }
}

impl SegmentationPolicy {
    /// Create policy from environment variables.
    ///
    /// Missing or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            relevance_threshold: env_f64("SCENELENS_RELEVANCE_THRESHOLD", defaults.relevance_threshold),
            confident_similarity: env_f64("SCENELENS_CONFIDENT_SIMILARITY", defaults.confident_similarity),
            confident_max_gap_seconds: env_f64(
                "SCENELENS_CONFIDENT_MAX_GAP",
                defaults.confident_max_gap_seconds,
            ),
            base_max_gap_seconds: env_f64("SCENELENS_BASE_MAX_GAP", defaults.base_max_gap_seconds),
            max_score_diff: env_f64("SCENELENS_MAX_SCORE_DIFF", defaults.max_score_diff),
            min_segment_duration_seconds: env_f64(
                "SCENELENS_MIN_SEGMENT_DURATION",
                defaults.min_segment_duration_seconds,
            ),
            merge_base_gap_seconds: env_f64("SCENELENS_MERGE_BASE_GAP", defaults.merge_base_gap_seconds),
            merge_confidence_gap_seconds: env_f64(
                "SCENELENS_MERGE_CONFIDENCE_GAP",
                defaults.merge_confidence_gap_seconds,
            ),
            quality_floor: env_f64("SCENELENS_QUALITY_FLOOR", defaults.quality_floor),
            quality_ratio: env_f64("SCENELENS_QUALITY_RATIO", defaults.quality_ratio),
            diversity_min_spacing_seconds: env_f64(
                "SCENELENS_DIVERSITY_SPACING",
                defaults.diversity_min_spacing_seconds,
            ),
        }
    }

    /// Gap tolerated between two neighbouring frames with the given scores.
    pub fn max_gap_for(&self, score_a: f64, score_b: f64) -> f64 {
        let avg_similarity = (score_a + score_b) / 2.0;
        if avg_similarity > self.confident_similarity {
            self.confident_max_gap_seconds
        } else {
            self.base_max_gap_seconds
        }
    }

    /// Gap bridged when merging two segments with the given scores.
    pub fn merge_gap_for(&self, score_a: f64, score_b: f64) -> f64 {
        let avg_score = (score_a + score_b) / 2.0;
        self.merge_base_gap_seconds + avg_score * self.merge_confidence_gap_seconds
    }

    /// Minimum score a segment needs to survive next to `best_score`.
    pub fn quality_threshold_for(&self, best_score: f64) -> f64 {
        self.quality_floor.max(best_score * self.quality_ratio)
    }

    /// Validate the policy.
    pub fn validate(&self) -> EngineResult<()> {
        let unit_fields = [
            ("relevance_threshold", self.relevance_threshold),
            ("confident_similarity", self.confident_similarity),
            ("max_score_diff", self.max_score_diff),
            ("quality_floor", self.quality_floor),
            ("quality_ratio", self.quality_ratio),
        ];
        for (name, value) in unit_fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::invalid_policy(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let second_fields = [
            ("confident_max_gap_seconds", self.confident_max_gap_seconds),
            ("base_max_gap_seconds", self.base_max_gap_seconds),
            ("min_segment_duration_seconds", self.min_segment_duration_seconds),
            ("merge_base_gap_seconds", self.merge_base_gap_seconds),
            ("merge_confidence_gap_seconds", self.merge_confidence_gap_seconds),
            ("diversity_min_spacing_seconds", self.diversity_min_spacing_seconds),
        ];
        for (name, value) in second_fields {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid_policy(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        if self.min_segment_duration_seconds == 0.0 {
            return Err(EngineError::invalid_policy(
                "min_segment_duration_seconds must be positive",
            ));
        }

        Ok(())
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
