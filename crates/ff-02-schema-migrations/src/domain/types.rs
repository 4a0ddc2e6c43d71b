use std::fmt;

/// A reversible schema change known to the running code.
///
/// Identity is the migration's position in the compiled-in list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub up: &'static str,
    pub down: &'static str,
}

impl Migration {
    pub const fn new(up: &'static str, down: &'static str) -> Self {
        Self { up, down }
    }
}

/// A migration as recorded in the store's history table.
///
/// `up` and `down` are the exact texts that were executed, which may differ
/// from what the code carries today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: usize,
    pub up: String,
    pub down: String,
}

/// Which half of a migration ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// What one migration run actually did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions whose stored `down` text was overwritten without replay.
    pub repaired: Vec<usize>,
    /// Versions rolled back, highest first.
    pub rolled_back: Vec<usize>,
    /// Versions applied, lowest first.
    pub applied: Vec<usize>,
}

impl MigrationReport {
    /// True when the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.repaired.is_empty() && self.rolled_back.is_empty() && self.applied.is_empty()
    }
}
