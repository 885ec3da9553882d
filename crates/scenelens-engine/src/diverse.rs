//! Temporal diverse selection.
//!
//! Picks a bounded number of high-scoring frames that are spread out in
//! time. Used to cap the candidate count before segmentation (preview
//! searches); it is independent of the segmentation stages.

use scenelens_models::ScoredFrame;
use tracing::debug;

/// Select up to `k` candidates, preferring frames at least `min_spacing`
/// seconds away from every frame already selected.
///
/// `candidates` must be ordered by relevance score, highest first. A first
/// pass accepts diverse candidates in that order; if it ends short of `k`,
/// the skipped candidates fill the remainder, still in score order. The
/// result is in selection order, not time order.
pub fn select_diverse<I>(
    candidates: &[ScoredFrame<I>],
    k: usize,
    min_spacing: f64,
) -> Vec<&ScoredFrame<I>> {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut taken = vec![false; candidates.len()];
    let mut selected: Vec<&ScoredFrame<I>> = Vec::with_capacity(k.min(candidates.len()));

    for (i, candidate) in candidates.iter().enumerate() {
        if selected.len() >= k {
            break;
        }

        let is_diverse = selected.iter().all(|chosen| {
            (candidate.timestamp_seconds - chosen.timestamp_seconds).abs() >= min_spacing
        });

        if is_diverse {
            taken[i] = true;
            selected.push(candidate);
        }
    }

    let diverse_count = selected.len();

    if selected.len() < k {
        for (i, candidate) in candidates.iter().enumerate() {
            if selected.len() >= k {
                break;
            }
            if !taken[i] {
                selected.push(candidate);
            }
        }
    }

    debug!(
        candidates = candidates.len(),
        k,
        diverse = diverse_count,
        filled = selected.len() - diverse_count,
        "Diverse selection complete"
    );

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64, ts: f64, score: f64) -> ScoredFrame<u64> {
        ScoredFrame::new(index, ts, score, index)
    }

    fn indices(selected: &[&ScoredFrame<u64>]) -> Vec<u64> {
        selected.iter().map(|f| f.frame_index).collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert!(select_diverse::<u64>(&[], 3, 0.5).is_empty());
        assert!(select_diverse(&[frame(0, 0.0, 0.9)], 0, 0.5).is_empty());
    }

    #[test]
    fn test_prefers_spread_frames() {
        // Sorted by score desc; 1 and 2 crowd frame 0
        let candidates = vec![
            frame(0, 10.0, 0.95),
            frame(1, 10.25, 0.94),
            frame(2, 9.9, 0.93),
            frame(3, 20.0, 0.80),
            frame(4, 30.0, 0.70),
        ];

        let selected = select_diverse(&candidates, 3, 0.5);
        assert_eq!(indices(&selected), vec![0, 3, 4]);
    }

    #[test]
    fn test_fills_with_skipped_candidates_in_score_order() {
        let candidates = vec![
            frame(0, 1.0, 0.9),
            frame(1, 1.1, 0.8),
            frame(2, 1.2, 0.7),
            frame(3, 5.0, 0.6),
        ];

        let selected = select_diverse(&candidates, 3, 0.5);
        // Diverse pass takes 0 and 3, then 1 fills the last slot
        assert_eq!(indices(&selected), vec![0, 3, 1]);
    }

    #[test]
    fn test_returns_all_when_k_exceeds_candidates() {
        let candidates = vec![frame(0, 0.0, 0.9), frame(1, 0.1, 0.8)];
        let selected = select_diverse(&candidates, 10, 0.5);
        assert_eq!(indices(&selected), vec![0, 1]);
    }

    #[test]
    fn test_spacing_is_inclusive() {
        let candidates = vec![frame(0, 0.0, 0.9), frame(1, 0.5, 0.8), frame(2, 0.7, 0.7)];
        let selected = select_diverse(&candidates, 2, 0.5);
        assert_eq!(indices(&selected), vec![0, 1]);
    }
}
