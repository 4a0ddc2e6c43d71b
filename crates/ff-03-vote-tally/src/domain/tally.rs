//! # Category Tally
//!
//! Counts are kept sparse (`candidate -> count`) together with the highest
//! candidate index ever seen. They are densified only when a wire payload is
//! built: indices without votes report 0, and the array length is the
//! highest index seen plus one, or zero when the category has no votes.

use ff_01_durable_store::VoteRecord;
use shared_types::{CandidateId, CategoryId, StatsPayload};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Derived view over the vote records of one category.
#[derive(Debug, Clone, Default)]
pub struct CategoryTally {
    category: CategoryId,
    /// voter id -> current candidate
    choices: HashMap<String, CandidateId>,
    counts: BTreeMap<CandidateId, u64>,
    highest: Option<CandidateId>,
}

/// Everything `apply` overwrote, so that `revert` can put it back exactly.
#[derive(Debug, Clone)]
pub(crate) struct TallyUndo {
    voter_id: String,
    previous_choice: Option<CandidateId>,
    /// Prior count entries of the candidates touched, in touch order.
    previous_counts: Vec<(CandidateId, Option<u64>)>,
    previous_highest: Option<CandidateId>,
}

impl TallyUndo {
    pub(crate) fn previous_choice(&self) -> Option<CandidateId> {
        self.previous_choice
    }
}

impl CategoryTally {
    /// A tally with no votes.
    pub fn empty(category: CategoryId) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Build a tally from stored records in a single pass.
    pub fn from_records(category: CategoryId, records: &[VoteRecord]) -> Self {
        let mut tally = Self::empty(category);
        for record in records {
            tally.apply(&record.voter_id, record.candidate_id);
        }
        tally
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    /// The candidate `voter_id` currently holds, if any.
    pub fn choice_of(&self, voter_id: &str) -> Option<CandidateId> {
        self.choices.get(voter_id).copied()
    }

    /// Votes currently held by `candidate`; 0 when it has none.
    pub fn count(&self, candidate: CandidateId) -> u64 {
        self.counts.get(&candidate).copied().unwrap_or(0)
    }

    /// Number of distinct voters with a live vote.
    pub fn voter_count(&self) -> usize {
        self.choices.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Dense, zero-filled counts indexed by candidate.
    pub fn dense_counts(&self) -> Vec<u64> {
        match self.highest {
            None => Vec::new(),
            Some(highest) => (0..=highest).map(|candidate| self.count(candidate)).collect(),
        }
    }

    pub fn to_stats(&self) -> StatsPayload {
        StatsPayload {
            category: self.category,
            votes: self.dense_counts(),
        }
    }

    /// Move `voter_id` to `candidate`, replacing any earlier choice.
    pub(crate) fn apply(&mut self, voter_id: &str, candidate: CandidateId) -> TallyUndo {
        let previous_choice = self.choice_of(voter_id);
        let mut undo = TallyUndo {
            voter_id: voter_id.to_string(),
            previous_choice,
            previous_counts: Vec::with_capacity(2),
            previous_highest: self.highest,
        };

        if let Some(previous) = previous_choice {
            undo.previous_counts
                .push((previous, self.counts.get(&previous).copied()));
            let count = self.count(previous);
            if count == 0 {
                warn!(
                    category = self.category,
                    candidate = previous,
                    voter_id = %voter_id,
                    "Tally had no count for the previous choice, clamping to zero"
                );
            }
            self.counts.insert(previous, count.saturating_sub(1));
        }

        undo.previous_counts
            .push((candidate, self.counts.get(&candidate).copied()));
        *self.counts.entry(candidate).or_insert(0) += 1;
        self.choices.insert(voter_id.to_string(), candidate);
        self.highest = self.highest.max(Some(candidate));
        undo
    }

    /// Undo one `apply`. Must be called before any other mutation.
    pub(crate) fn revert(&mut self, undo: TallyUndo) {
        // Restore in reverse touch order so a same-candidate revote ends on
        // the oldest value.
        for (candidate, count) in undo.previous_counts.into_iter().rev() {
            match count {
                Some(count) => self.counts.insert(candidate, count),
                None => self.counts.remove(&candidate),
            };
        }
        match undo.previous_choice {
            Some(previous) => self.choices.insert(undo.voter_id, previous),
            None => self.choices.remove(&undo.voter_id),
        };
        self.highest = undo.previous_highest;
    }
}

/// Two tallies are equal when the same voters hold the same choices and
/// every candidate holds the same number of votes. Explicit zero entries are
/// not significant.
impl PartialEq for CategoryTally {
    fn eq(&self, other: &Self) -> bool {
        let nonzero = |tally: &Self| -> Vec<(CandidateId, u64)> {
            tally
                .counts
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(candidate, count)| (*candidate, *count))
                .collect()
        };
        self.category == other.category
            && self.choices == other.choices
            && nonzero(self) == nonzero(other)
    }
}

impl Eq for CategoryTally {}
