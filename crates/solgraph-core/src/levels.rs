//! Layering of the resolved graph for display
//!
//! Level 1 holds the projects nothing references. Each following level
//! holds the projects whose referencers have all been shown already.
//! Orphans are left out. Projects in or below a cycle never become ready
//! and are reported as unplaced rather than placed in a level.

use std::collections::HashSet;

use crate::model::{CanonicalPath, ProjectRecord};

/// Levels and leftovers, as indices into the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    pub levels: Vec<Vec<usize>>,
    /// Non-orphan projects that never became ready.
    pub unplaced: Vec<usize>,
}

pub fn assign_levels(projects: &[ProjectRecord]) -> Layering {
    let mut remaining: Vec<usize> = projects
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_orphan())
        .map(|(index, _)| index)
        .collect();
    let mut placed: HashSet<&CanonicalPath> = HashSet::new();
    let mut levels = Vec::new();

    loop {
        let (ready, rest): (Vec<usize>, Vec<usize>) = remaining.iter().copied().partition(|&index| {
            projects[index]
                .referenced_by
                .iter()
                .all(|referrer| placed.contains(referrer))
        });
        if ready.is_empty() {
            break;
        }
        placed.extend(ready.iter().filter_map(|&index| projects[index].canonical_path.as_ref()));
        levels.push(ready);
        remaining = rest;
    }

    if !remaining.is_empty() {
        tracing::debug!("{} projects could not be placed in any level", remaining.len());
    }

    Layering {
        levels,
        unplaced: remaining,
    }
}
