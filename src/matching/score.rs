//! Set-overlap similarity scoring.

use std::collections::BTreeSet;

/// Jaccard index of two token sets.
///
/// An empty set signals "no information", so any comparison involving one
/// scores 0.0 rather than the degenerate 1.0 of empty-vs-empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Batch-path Jaccard from precomputed set sizes and a shared-token count.
/// Union is clamped to 1 to guard pathological zero-size inputs.
pub(crate) fn jaccard_from_sizes(len_a: usize, len_b: usize, intersection: usize) -> f64 {
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    let union = (len_a + len_b).saturating_sub(intersection).max(1);
    intersection as f64 / union as f64
}
