//! Inverted token index: the blocking structure that keeps candidate
//! generation proportional to shared-token co-occurrences instead of the
//! full cross product.

use std::collections::HashMap;

use crate::models::NamedRecord;

/// token -> positions of the records containing it. Posting lists are sorted
/// and duplicate-free because each record contributes a token at most once.
#[derive(Debug, Default)]
pub struct TokenIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl TokenIndex {
    /// Records with empty token sets contribute nothing and therefore can
    /// never appear in a candidate pair.
    pub fn build(records: &[NamedRecord]) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for record in records {
            for token in &record.tokens {
                postings.entry(token.clone()).or_default().push(record.id);
            }
        }
        Self { postings }
    }

    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    pub fn postings(&self, token: &str) -> Option<&[usize]> {
        self.postings.get(token).map(|v| v.as_slice())
    }

    /// Shared-token counts for every (self record, other record) pair sharing
    /// at least one token. Because a token holds each record id at most once,
    /// the accumulated count is the exact intersection size; no pair can be
    /// inflated through a redundant path.
    pub fn overlaps(&self, other: &TokenIndex) -> HashMap<(usize, usize), usize> {
        let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
        for (token, ids) in &self.postings {
            let Some(other_ids) = other.postings.get(token) else {
                continue;
            };
            for &i in ids {
                for &j in other_ids {
                    *counts.entry((i, j)).or_insert(0) += 1;
                }
            }
        }
        counts
    }
}
