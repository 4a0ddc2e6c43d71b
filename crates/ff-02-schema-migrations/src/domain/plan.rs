//! # Divergence Planner
//!
//! Pure computation of what a run must do, given the recorded history and
//! the compiled-in list. No I/O happens here.

use super::errors::MigrationError;
use super::types::{AppliedMigration, Migration};

/// Steps required to make the recorded history equal the known list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// First index where the recorded `up` differs from the known `up`,
    /// or the shorter length when the overlap agrees.
    pub divergence: usize,
    /// Indices before `divergence` whose `down` text needs overwriting.
    pub repairs: Vec<usize>,
    /// Indices to roll back, strictly descending, ending at `divergence`.
    pub rollbacks: Vec<usize>,
    /// Indices to apply, strictly ascending, starting at `divergence`.
    pub applies: Vec<usize>,
}

impl MigrationPlan {
    pub fn is_noop(&self) -> bool {
        self.repairs.is_empty() && self.rollbacks.is_empty() && self.applies.is_empty()
    }
}

/// Compute the plan for `applied` (ordered by version) against `known`.
///
/// Fails when the history is not contiguous from 0, or when it holds more
/// migrations than the code knows (an older build must not guess how to
/// treat a newer schema).
pub fn plan(
    applied: &[AppliedMigration],
    known: &[Migration],
) -> Result<MigrationPlan, MigrationError> {
    for (expected, record) in applied.iter().enumerate() {
        if record.version != expected {
            return Err(MigrationError::CorruptHistory {
                expected,
                found: record.version as i64,
            });
        }
    }

    if applied.len() > known.len() {
        return Err(MigrationError::SchemaAhead {
            found: applied.len(),
            supported: known.len(),
        });
    }

    let overlap = applied.len().min(known.len());
    let divergence = (0..overlap)
        .find(|&i| applied[i].up != known[i].up)
        .unwrap_or(overlap);

    let repairs = (0..divergence)
        .filter(|&i| applied[i].down != known[i].down)
        .collect();

    let rollbacks = (divergence..applied.len()).rev().collect();
    let applies = (divergence..known.len()).collect();

    Ok(MigrationPlan {
        divergence,
        repairs,
        rollbacks,
        applies,
    })
}
