use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::ContributionRecord;
use crate::utils::locale_cmp;

/// The loaded contribution records, sorted by author name.
///
/// Populated once at load time and read-only for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    records: Vec<ContributionRecord>,
    file_types: Vec<String>,
}

impl DataStore {
    /// Build a store from records in any order.
    pub fn from_records(mut records: Vec<ContributionRecord>) -> Self {
        records.sort_by(|a, b| locale_cmp(&a.author, &b.author));

        let mut file_types: Vec<String> = Vec::new();
        for record in &records {
            for file_type in record.contributions.keys() {
                if !file_types.iter().any(|known| known == file_type) {
                    file_types.push(file_type.to_string());
                }
            }
        }

        Self { records, file_types }
    }

    /// Parse a contributions document (a JSON array of records).
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let records: Vec<ContributionRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::from_records(records))
    }

    /// Read and parse the contributions document at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading contributions document");
        let bytes = tokio::fs::read(path).await?;
        let store = Self::from_json_slice(&bytes)?;
        info!(
            authors = store.records.len(),
            file_types = store.file_types.len(),
            "loaded contributions document"
        );
        Ok(store)
    }

    pub fn records(&self) -> &[ContributionRecord] {
        &self.records
    }

    /// Author names in display order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.author.as_str())
    }

    pub fn get(&self, author: &str) -> Option<&ContributionRecord> {
        self.records.iter().find(|record| record.author == author)
    }

    /// Every file type seen across all authors, in first-seen order.
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
