use rayon::prelude::*;

use crate::metrics::memory_snapshot;
use crate::models::NamedRecord;
use crate::normalize::Tokenizer;

pub mod index;
pub mod score;

use index::TokenIndex;
use score::jaccard_from_sizes;

/// Outcome of linking one source record against the registry.
///
/// `BelowThreshold` and `NoCandidates` both surface downstream as the
/// review outcome; they stay separate here so tests can tell a weak best
/// candidate apart from no candidate at all.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// Best candidate met the confidence threshold.
    Matched { target: usize, score: f64 },
    /// Candidates existed but the best score fell short of the threshold.
    BelowThreshold { target: usize, score: f64 },
    /// No registry record shared a single token with this record.
    NoCandidates,
    /// Source name was absent or blank. Overrides any candidate outcome.
    MissingName,
}

impl LinkOutcome {
    pub fn matched_target(&self) -> Option<(usize, f64)> {
        match *self {
            LinkOutcome::Matched { target, score } => Some((target, score)),
            _ => None,
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(
            self,
            LinkOutcome::BelowThreshold { .. } | LinkOutcome::NoCandidates
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
    pub percent: f32,
    pub mem_used_mb: u64,
    pub mem_avail_mb: u64,
    pub stage: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressConfig {
    pub update_every: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { update_every: 1000 }
    }
}

/// Tokenize raw names into matcher-facing records. Tokenization is pure and
/// per-row, so it runs on the rayon pool.
pub fn build_records(names: &[Option<String>], tokenizer: &Tokenizer) -> Vec<NamedRecord> {
    names
        .par_iter()
        .enumerate()
        .map(|(id, name)| NamedRecord {
            id,
            name: name.clone(),
            tokens: tokenizer.tokenize(name.as_deref()),
        })
        .collect()
}

/// Link every source record to at most one registry record.
///
/// Candidate pairs come from the shared-token index; each is scored with the
/// size-based Jaccard form. Selection per source record is deterministic:
/// score descending, then registry position ascending. The threshold
/// comparison is `>=`, so a score exactly at the threshold matches.
pub fn link_records<F>(
    sources: &[NamedRecord],
    targets: &[NamedRecord],
    threshold: f64,
    cfg: ProgressConfig,
    on_progress: F,
) -> Vec<LinkOutcome>
where
    F: Fn(ProgressUpdate) + Sync,
{
    let source_index = TokenIndex::build(sources);
    let target_index = TokenIndex::build(targets);
    let overlaps = source_index.overlaps(&target_index);

    let total = overlaps.len();
    let mut best: Vec<Option<(usize, f64)>> = vec![None; sources.len()];
    for (n, (&(i, j), &shared)) in overlaps.iter().enumerate() {
        if n % cfg.update_every.max(1) == 0 {
            let mem = memory_snapshot();
            on_progress(ProgressUpdate {
                processed: n,
                total,
                percent: (n as f32 / total.max(1) as f32) * 100.0,
                mem_used_mb: mem.used_mb,
                mem_avail_mb: mem.avail_mb,
                stage: "score_candidates",
            });
        }
        let score = jaccard_from_sizes(sources[i].tokens.len(), targets[j].tokens.len(), shared);
        let replace = match best[i] {
            None => true,
            Some((best_j, best_s)) => score > best_s || (score == best_s && j < best_j),
        };
        if replace {
            best[i] = Some((j, score));
        }
    }

    sources
        .iter()
        .map(|record| {
            if !record.has_name() {
                return LinkOutcome::MissingName;
            }
            match best[record.id] {
                Some((j, s)) if s >= threshold => LinkOutcome::Matched { target: j, score: s },
                Some((j, s)) => LinkOutcome::BelowThreshold { target: j, score: s },
                None => LinkOutcome::NoCandidates,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::score::jaccard;

    fn records(names: &[&str]) -> Vec<NamedRecord> {
        let owned: Vec<Option<String>> = names.iter().map(|n| Some(n.to_string())).collect();
        build_records(&owned, &Tokenizer::default())
    }

    fn link(sources: &[NamedRecord], targets: &[NamedRecord], threshold: f64) -> Vec<LinkOutcome> {
        link_records(sources, targets, threshold, ProgressConfig::default(), |_| {})
    }

    #[test]
    fn stopword_variants_match_perfectly() {
        // "Foundation" and "Trust" are stopwords, leaving identical token sets
        let s = records(&["Alice Johnson Foundation"]);
        let t = records(&["Alice Johnson Trust"]);
        let out = link(&s, &t, 0.40);
        assert_eq!(
            out[0],
            LinkOutcome::Matched {
                target: 0,
                score: 1.0
            }
        );
    }

    #[test]
    fn disjoint_names_go_to_review() {
        let s = records(&["Bright Future LLC"]);
        let t = records(&["Shining Star Inc"]);
        let out = link(&s, &t, 0.40);
        assert_eq!(out[0], LinkOutcome::NoCandidates);
        assert!(out[0].needs_review());
    }

    #[test]
    fn blank_name_overrides_everything() {
        let s = records(&[""]);
        let t = records(&["Anything At All"]);
        assert_eq!(link(&s, &t, 0.40)[0], LinkOutcome::MissingName);
        assert_eq!(link(&s, &t, 0.0)[0], LinkOutcome::MissingName);
    }

    #[test]
    fn threshold_comparison_is_inclusive() {
        // {bright, future} vs {bright, star}: score 1/3
        let s = records(&["Bright Future"]);
        let t = records(&["Bright Star"]);
        let third = 1.0 / 3.0;
        match &link(&s, &t, third)[0] {
            LinkOutcome::Matched { target: 0, score } => assert!((score - third).abs() < 1e-9),
            other => panic!("expected match at exact threshold, got {:?}", other),
        }
        // any positive overlap matches at threshold 0.0
        assert!(link(&s, &t, 0.0)[0].matched_target().is_some());
    }

    #[test]
    fn weak_best_candidate_is_below_threshold() {
        let s = records(&["Bright Future"]);
        let t = records(&["Bright Star"]);
        match &link(&s, &t, 0.40)[0] {
            LinkOutcome::BelowThreshold { target: 0, score } => {
                assert!((score - 1.0 / 3.0).abs() < 1e-9)
            }
            other => panic!("expected below-threshold, got {:?}", other),
        }
    }

    #[test]
    fn best_score_wins() {
        let s = records(&["Alice Johnson Memorial Fund"]);
        let t = records(&["Johnson Controls", "Alice Johnson Memorial Fund", "Alice Smith"]);
        let out = link(&s, &t, 0.40);
        let (target, score) = out[0].matched_target().unwrap();
        assert_eq!(target, 1);
        // selected score dominates every other candidate's score
        for cand in &t {
            assert!(score >= jaccard(&s[0].tokens, &cand.tokens));
        }
    }

    #[test]
    fn ties_break_to_lowest_registry_position() {
        let s = records(&["Alice Johnson"]);
        let t = records(&["Alice Johnson", "Alice Johnson"]);
        assert_eq!(
            link(&s, &t, 0.40)[0],
            LinkOutcome::Matched {
                target: 0,
                score: 1.0
            }
        );
    }

    #[test]
    fn raising_threshold_only_demotes() {
        let s = records(&[
            "Alice Johnson Foundation",
            "Bright Future Fund",
            "Greenway Park Assoc",
        ]);
        let t = records(&["Alice Johnson", "Bright Star Future", "Riverside Park"]);
        let low = link(&s, &t, 0.20);
        let high = link(&s, &t, 0.60);
        for (lo, hi) in low.iter().zip(high.iter()) {
            if hi.matched_target().is_some() {
                // matched at the higher bar implies matched at the lower one
                assert!(lo.matched_target().is_some());
            }
            if matches!(lo, LinkOutcome::MissingName) {
                assert!(matches!(hi, LinkOutcome::MissingName));
            }
        }
    }

    #[test]
    fn registry_records_can_be_claimed_many_times() {
        let s = records(&["Acme Widgets", "Acme Widgets East"]);
        let t = records(&["Acme Widgets"]);
        let out = link(&s, &t, 0.40);
        assert!(out.iter().all(|o| o.matched_target().map(|(j, _)| j) == Some(0)));
    }
}
