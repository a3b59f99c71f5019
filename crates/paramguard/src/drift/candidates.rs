//! Column diff between two snapshots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::Snapshot;

use super::nullness::is_effectively_null;

/// Whether a parameter appeared or disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Added,
    Removed,
}

/// What the local diff observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The column is missing from the other snapshot.
    NotPresent,
    /// Effectively null before, carrying data now.
    BecamePopulated,
    /// Carrying data before, effectively null now.
    BecameEmpty,
}

impl ChangeKind {
    /// Report wording for this change.
    pub fn reason(&self, direction: Direction) -> &'static str {
        match (self, direction) {
            (ChangeKind::NotPresent, Direction::Added) => "Not present in old version",
            (ChangeKind::NotPresent, Direction::Removed) => "Not present in new version",
            (ChangeKind::BecamePopulated, _) => "Was null/empty in old version, now has data",
            (ChangeKind::BecameEmpty, _) => "Had data in old version, now null/empty",
        }
    }
}

/// A column the local diff flags as possibly new or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub parameter: String,
    pub direction: Direction,
    pub kind: ChangeKind,
}

impl Candidate {
    pub fn reason(&self) -> &'static str {
        self.kind.reason(self.direction)
    }
}

/// Column sets after exclusions.
#[derive(Debug, Clone, Default)]
pub struct ColumnDiff {
    pub old: BTreeSet<String>,
    pub new: BTreeSet<String>,
}

impl ColumnDiff {
    pub fn new(old: &Snapshot, new: &Snapshot, exclude: &BTreeSet<String>) -> Self {
        let keep = |name: &str| !exclude.contains(name);
        Self {
            old: old.column_names().filter(|n| keep(n)).map(str::to_string).collect(),
            new: new.column_names().filter(|n| keep(n)).map(str::to_string).collect(),
        }
    }

    pub fn common(&self) -> impl Iterator<Item = &String> {
        self.old.intersection(&self.new)
    }
}

/// Find added and removed candidates, each list sorted by parameter name.
pub fn find_candidates(
    old: &Snapshot,
    new: &Snapshot,
    diff: &ColumnDiff,
) -> (Vec<Candidate>, Vec<Candidate>) {
    let mut added: Vec<Candidate> = diff
        .new
        .difference(&diff.old)
        .map(|name| Candidate {
            parameter: name.clone(),
            direction: Direction::Added,
            kind: ChangeKind::NotPresent,
        })
        .collect();

    let mut removed: Vec<Candidate> = diff
        .old
        .difference(&diff.new)
        .map(|name| Candidate {
            parameter: name.clone(),
            direction: Direction::Removed,
            kind: ChangeKind::NotPresent,
        })
        .collect();

    for name in diff.common() {
        let (Some(before), Some(after)) = (old.column(name), new.column(name)) else {
            continue;
        };
        match (is_effectively_null(before), is_effectively_null(after)) {
            (true, false) => added.push(Candidate {
                parameter: name.clone(),
                direction: Direction::Added,
                kind: ChangeKind::BecamePopulated,
            }),
            (false, true) => removed.push(Candidate {
                parameter: name.clone(),
                direction: Direction::Removed,
                kind: ChangeKind::BecameEmpty,
            }),
            _ => {}
        }
    }

    added.sort_by(|a, b| a.parameter.cmp(&b.parameter));
    removed.sort_by(|a, b| a.parameter.cmp(&b.parameter));
    (added, removed)
}
