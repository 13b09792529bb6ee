use tracing::debug;

use crate::analysis::{AuthorSelection, DataStore, FilterState};

/// A user interaction with the selection controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// `None` clears the selection back to all authors.
    AuthorChanged(Option<String>),
    FileTypeChanged { file_type: String, checked: bool },
    SelectAllFileTypes,
    ClearFileTypes,
}

/// Keeps the author selector and file-type checkboxes in step with the data
/// and turns their events into [`FilterState`] changes.
#[derive(Debug, Clone, Default)]
pub struct ControlsBinder {
    authors: Vec<String>,
    file_types: Vec<String>,
}

impl ControlsBinder {
    /// Build the controls for freshly loaded data, replacing any previous ones.
    pub fn bind(store: &DataStore) -> Self {
        Self {
            authors: store.authors().map(str::to_string).collect(),
            file_types: store.file_types().to_vec(),
        }
    }

    /// Author options in selector order.
    pub fn author_options(&self) -> &[String] {
        &self.authors
    }

    pub fn file_type_options(&self) -> &[String] {
        &self.file_types
    }

    /// The checkbox set as projected from `filter`.
    pub fn checkboxes<'a>(
        &'a self,
        filter: &'a FilterState,
    ) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        self.file_types
            .iter()
            .map(move |file_type| (file_type.as_str(), filter.is_selected(file_type)))
    }

    /// Apply `event` to `filter`. Returns whether the filter changed.
    pub fn apply(&self, filter: &mut FilterState, event: ControlEvent) -> bool {
        let before = filter.clone();

        match event {
            ControlEvent::AuthorChanged(author) => {
                filter.select_author(AuthorSelection::from(author));
            }
            ControlEvent::FileTypeChanged { file_type, checked } => {
                if self.file_types.contains(&file_type) {
                    filter.set_file_type(&file_type, checked);
                } else {
                    debug!(%file_type, "ignoring change for unknown file type");
                }
            }
            ControlEvent::SelectAllFileTypes => {
                filter.select_file_types(self.file_types.iter().cloned());
            }
            ControlEvent::ClearFileTypes => filter.clear_file_types(),
        }

        *filter != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContributionRecord, LineCounts};
    use pretty_assertions::assert_eq;

    fn store() -> DataStore {
        let record = |author: &str, types: &[&str]| ContributionRecord {
            author: author.to_string(),
            contributions: types
                .iter()
                .map(|file_type| (*file_type, LineCounts::new(1, 1)))
                .collect(),
            commits: Vec::new(),
        };
        DataStore::from_records(vec![
            record("zoe", &["rs", "toml"]),
            record("Ann", &["js"]),
            record("mike", &["rs", "md"]),
        ])
    }

    #[test]
    fn test_bind_populates_sorted_authors_and_union_of_types() {
        let binder = ControlsBinder::bind(&store());
        assert_eq!(binder.author_options(), &["Ann", "mike", "zoe"]);
        assert_eq!(binder.file_type_options(), &["js", "rs", "md", "toml"]);
    }

    #[test]
    fn test_checkboxes_start_checked() {
        let store = store();
        let binder = ControlsBinder::bind(&store);
        let filter = FilterState::initial(&store);
        assert!(binder.checkboxes(&filter).all(|(_, checked)| checked));
    }

    #[test]
    fn test_checkbox_change_preserves_author() {
        let store = store();
        let binder = ControlsBinder::bind(&store);
        let mut filter = FilterState::initial(&store);

        assert!(binder.apply(&mut filter, ControlEvent::AuthorChanged(Some("mike".to_string()))));
        assert!(binder.apply(
            &mut filter,
            ControlEvent::FileTypeChanged {
                file_type: "md".to_string(),
                checked: false,
            }
        ));

        assert_eq!(filter.author(), &AuthorSelection::Author("mike".to_string()));
        assert_eq!(
            binder.checkboxes(&filter).collect::<Vec<_>>(),
            vec![("js", true), ("rs", true), ("md", false), ("toml", true)]
        );
    }

    #[test]
    fn test_clearing_author_returns_to_all() {
        let store = store();
        let binder = ControlsBinder::bind(&store);
        let mut filter = FilterState::initial(&store);
        binder.apply(&mut filter, ControlEvent::AuthorChanged(Some("Ann".to_string())));
        binder.apply(&mut filter, ControlEvent::AuthorChanged(None));
        assert_eq!(filter.author(), &AuthorSelection::All);
    }

    #[test]
    fn test_unknown_file_type_is_ignored() {
        let store = store();
        let binder = ControlsBinder::bind(&store);
        let mut filter = FilterState::initial(&store);
        let changed = binder.apply(
            &mut filter,
            ControlEvent::FileTypeChanged {
                file_type: "exe".to_string(),
                checked: true,
            },
        );
        assert!(!changed);
        assert!(!filter.is_selected("exe"));
    }

    #[test]
    fn test_select_all_and_clear() {
        let store = store();
        let binder = ControlsBinder::bind(&store);
        let mut filter = FilterState::initial(&store);

        assert!(binder.apply(&mut filter, ControlEvent::ClearFileTypes));
        assert!(binder.checkboxes(&filter).all(|(_, checked)| !checked));
        assert!(!binder.apply(&mut filter, ControlEvent::ClearFileTypes));

        assert!(binder.apply(&mut filter, ControlEvent::SelectAllFileTypes));
        assert_eq!(filter, FilterState::initial(&store));
    }
}
