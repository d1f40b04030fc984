// ranking.rs - Bounded top-K selection of candidate scores

use crate::core::scorer::CandidateScore;
use std::cmp::Ordering;

/// Ranking order: higher CLR first, ties broken by ascending person id
pub fn rank_order(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.clr
        .total_cmp(&a.clr)
        .then_with(|| a.person_id.cmp(&b.person_id))
}

/// Keeps the best `capacity` candidates seen so far, always sorted
#[derive(Debug, Clone)]
pub struct TopCandidates {
    capacity: usize,
    entries: Vec<CandidateScore>,
}

impl TopCandidates {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a candidate, dropping whichever entry falls off the end
    pub fn push(&mut self, candidate: CandidateScore) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            if let Some(last) = self.entries.last() {
                if rank_order(&candidate, last) != Ordering::Less {
                    return;
                }
            }
        }
        let position = self
            .entries
            .binary_search_by(|entry| rank_order(entry, &candidate))
            .unwrap_or_else(|insert_at| insert_at);
        self.entries.insert(position, candidate);
        self.entries.truncate(self.capacity);
    }

    /// Fold another partial ranking into this one
    pub fn merge(&mut self, other: TopCandidates) {
        for candidate in other.entries {
            self.push(candidate);
        }
    }

    pub fn as_slice(&self) -> &[CandidateScore] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<CandidateScore> {
        self.entries
    }
}

/// Sort candidates best-first and keep at most `k`
pub fn select_top(mut candidates: Vec<CandidateScore>, k: usize) -> Vec<CandidateScore> {
    candidates.sort_by(rank_order);
    candidates.truncate(k);
    candidates
}
