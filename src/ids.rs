//! Identifier allocation.
//!
//! Identifiers are `{prefix}{n}` with `n` zero-padded to three digits
//! (`C001`, `INV-012`). Two schemes are available:
//!
//! - [`IdStrategy::Positional`] derives `n` from the collection length. After
//!   a deletion it can hand out an identifier that is already in use.
//! - [`IdStrategy::Monotonic`] keeps a per-collection counter that never goes
//!   backwards, so identifiers stay unique whatever was deleted.

use crate::types::Collection;
use serde::{Deserialize, Serialize};

/// How new identifiers are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `length + 1` of the current collection.
    Positional,
    /// Highest number ever issued, plus one.
    #[default]
    Monotonic,
}

/// Format an identifier from its prefix and number.
pub fn format_id(prefix: &str, number: u64) -> String {
    format!("{}{:03}", prefix, number)
}

/// Numeric suffix of an identifier, if it carries the given prefix.
pub fn parse_id(prefix: &str, id: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}

/// Per-collection identifier allocator.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    collection: Collection,
    strategy: IdStrategy,
    /// Highest number issued or seen so far.
    high_water: u64,
}

impl IdAllocator {
    pub fn new(collection: Collection, strategy: IdStrategy) -> Self {
        Self {
            collection,
            strategy,
            high_water: 0,
        }
    }

    /// Record an identifier that entered the collection without allocation
    /// (seed data), so monotonic numbering continues after it.
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = parse_id(self.collection.id_prefix(), id) {
            self.high_water = self.high_water.max(n);
        }
    }

    /// Allocate the next identifier for a collection currently holding `len`
    /// records.
    pub fn allocate(&mut self, len: usize) -> String {
        let number = match self.strategy {
            IdStrategy::Positional => len as u64 + 1,
            IdStrategy::Monotonic => self.high_water + 1,
        };
        self.high_water = self.high_water.max(number);
        format_id(self.collection.id_prefix(), number)
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }
}
