/// The authoritative class listing derived from one dataset snapshot.
use constants::class::UNASSIGNED_NAME;
use constants::colour::{Rgba, UNASSIGNED_COLOUR, palette_colour};
use serde::{Deserialize, Serialize};

use crate::dataset::KnownClass;

/// One class of the current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub count: u64,
    pub colour: Rgba,
}

/// Ordered class entries for one snapshot. The final entry is always the
/// catch-all for unassigned codes, even when its count is zero, so it is
/// never spuriously dropped by reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassManifest {
    total_count: u64,
    entries: Vec<ClassEntry>,
}

impl ClassManifest {
    /// Builds the manifest from the dataset's known classes, deriving the
    /// catch-all count as the remainder of the total.
    pub fn from_known_classes(total_count: u64, known: &[KnownClass]) -> Self {
        let mut entries = Vec::with_capacity(known.len() + 1);
        let mut assigned = 0u64;
        for (index, class) in known.iter().enumerate() {
            assigned += class.count;
            entries.push(ClassEntry {
                name: class.name.clone(),
                count: class.count,
                colour: palette_colour(index),
            });
        }
        entries.push(ClassEntry {
            name: UNASSIGNED_NAME.to_string(),
            count: total_count.saturating_sub(assigned),
            colour: UNASSIGNED_COLOUR,
        });
        Self {
            total_count,
            entries,
        }
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// All entries, catch-all last.
    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    /// Known classes in dense code order, catch-all excluded.
    pub fn known(&self) -> &[ClassEntry] {
        &self.entries[..self.entries.len() - 1]
    }

    /// The catch-all entry for unassigned codes.
    pub fn unassigned(&self) -> &ClassEntry {
        &self.entries[self.entries.len() - 1]
    }
}
