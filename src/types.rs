//! # Common Types
//!
//! This module contains the data model shared by the loader, the aggregator,
//! the chart layer and the document generator. The JSON shape is:
//!
//! ```json
//! {
//!   "author": "Ann",
//!   "contributions": { "js": { "added": 10, "removed": 2 } },
//!   "commits": [ { "hash": "a1", "date": "2024-01-01", "message": "init" } ]
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lines added and removed for one file type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub added: u64,
    pub removed: u64,
}

impl LineCounts {
    pub fn new(added: u64, removed: u64) -> Self {
        Self { added, removed }
    }
}

/// Summary of a single commit as listed in the commit panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub hash: String,
    pub date: String,
    pub message: String,
}

/// Per-author contribution statistics.
///
/// `author` is the identity key: it is unique within a document and is used
/// as the value of the author selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub author: String,
    #[serde(default)]
    pub contributions: FileTypeStats,
    /// Commits in the order supplied by the document; never re-sorted.
    #[serde(default)]
    pub commits: Vec<CommitSummary>,
}

/// Line counts keyed by file extension, in the document's key order.
///
/// Lookups are linear; the single-author chart iterates in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTypeStats {
    entries: Vec<(String, LineCounts)>,
}

impl FileTypeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the counts for `file_type`. A replaced key keeps its
    /// original position.
    pub fn insert(&mut self, file_type: impl Into<String>, counts: LineCounts) {
        let file_type = file_type.into();
        match self.entries.iter_mut().find(|(key, _)| *key == file_type) {
            Some((_, existing)) => *existing = counts,
            None => self.entries.push((file_type, counts)),
        }
    }

    /// Add `added`/`removed` to the running totals for `file_type`.
    pub fn accumulate(&mut self, file_type: &str, added: u64, removed: u64) {
        match self.entries.iter_mut().find(|(key, _)| key == file_type) {
            Some((_, counts)) => {
                counts.added = counts.added.saturating_add(added);
                counts.removed = counts.removed.saturating_add(removed);
            }
            None => self
                .entries
                .push((file_type.to_string(), LineCounts::new(added, removed))),
        }
    }

    pub fn get(&self, file_type: &str) -> Option<&LineCounts> {
        self.entries
            .iter()
            .find(|(key, _)| key == file_type)
            .map(|(_, counts)| counts)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineCounts)> {
        self.entries.iter().map(|(key, counts)| (key.as_str(), counts))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, LineCounts)> for FileTypeStats {
    fn from_iter<I: IntoIterator<Item = (K, LineCounts)>>(iter: I) -> Self {
        let mut stats = FileTypeStats::new();
        for (key, counts) in iter {
            stats.insert(key, counts);
        }
        stats
    }
}

impl Serialize for FileTypeStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, counts) in &self.entries {
            map.serialize_entry(key, counts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileTypeStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatsVisitor;

        impl<'de> Visitor<'de> for StatsVisitor {
            type Value = FileTypeStats;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of file extensions to added/removed line counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut stats = FileTypeStats {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((key, counts)) = access.next_entry::<String, LineCounts>()? {
                    stats.insert(key, counts);
                }
                Ok(stats)
            }
        }

        deserializer.deserialize_map(StatsVisitor)
    }
}
