use std::collections::BTreeSet;

use super::{AuthorSelection, DataStore, FilterState};
use crate::types::ContributionRecord;

/// Added-line totals per author, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorTotals {
    pub authors: Vec<String>,
    pub totals: Vec<u64>,
}

impl AuthorTotals {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.authors
            .iter()
            .map(String::as_str)
            .zip(self.totals.iter().copied())
    }
}

/// Added and removed lines per file type for a single author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTypeBreakdown {
    pub author: String,
    pub file_types: Vec<String>,
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
}

impl FileTypeBreakdown {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64, u64)> {
        self.file_types
            .iter()
            .zip(self.added.iter().zip(self.removed.iter()))
            .map(|(file_type, (added, removed))| (file_type.as_str(), *added, *removed))
    }
}

/// The numbers behind one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartData {
    AuthorTotals(AuthorTotals),
    FileTypeBreakdown(FileTypeBreakdown),
}

/// Compute the chart data for the current filter.
///
/// Returns `None` when the selected author is not in the store.
pub fn aggregate(store: &DataStore, filter: &FilterState) -> Option<ChartData> {
    match filter.author() {
        AuthorSelection::All => Some(ChartData::AuthorTotals(author_totals(
            store,
            filter.selected_file_types(),
        ))),
        AuthorSelection::Author(name) => store.get(name).map(|record| {
            ChartData::FileTypeBreakdown(file_type_breakdown(record, filter.selected_file_types()))
        }),
    }
}

/// Sum of added lines per author over exactly the selected file types.
///
/// An empty selection yields zero for every author.
pub fn author_totals(store: &DataStore, selected: &BTreeSet<String>) -> AuthorTotals {
    let mut totals = AuthorTotals {
        authors: Vec::with_capacity(store.len()),
        totals: Vec::with_capacity(store.len()),
    };

    for record in store.records() {
        let total = selected
            .iter()
            .filter_map(|file_type| record.contributions.get(file_type))
            .fold(0u64, |acc, counts| acc.saturating_add(counts.added));
        totals.authors.push(record.author.clone());
        totals.totals.push(total);
    }

    totals
}

/// Per-file-type counts for one author, in the record's key order.
///
/// An empty selection means no filter here, unlike [`author_totals`].
pub fn file_type_breakdown(
    record: &ContributionRecord,
    selected: &BTreeSet<String>,
) -> FileTypeBreakdown {
    let mut breakdown = FileTypeBreakdown {
        author: record.author.clone(),
        ..Default::default()
    };

    for (file_type, counts) in record.contributions.iter() {
        if selected.is_empty() || selected.contains(file_type) {
            breakdown.file_types.push(file_type.to_string());
            breakdown.added.push(counts.added);
            breakdown.removed.push(counts.removed);
        }
    }

    breakdown
}
