use std::collections::BTreeSet;
use std::fmt;

use super::DataStore;

/// Which author the view is focused on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum AuthorSelection {
    #[default]
    All,
    Author(String),
}

impl AuthorSelection {
    pub fn author(&self) -> Option<&str> {
        match self {
            AuthorSelection::All => None,
            AuthorSelection::Author(name) => Some(name),
        }
    }
}

impl From<Option<String>> for AuthorSelection {
    fn from(author: Option<String>) -> Self {
        author.map_or(AuthorSelection::All, AuthorSelection::Author)
    }
}

impl fmt::Display for AuthorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorSelection::All => f.write_str("All authors"),
            AuthorSelection::Author(name) => f.write_str(name),
        }
    }
}

/// Current author and file-type selection.
///
/// Ephemeral UI state: created with defaults once data is loaded and changed
/// only by control events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    author: AuthorSelection,
    file_types: BTreeSet<String>,
}

impl FilterState {
    /// All authors, every known file type selected.
    pub fn initial(store: &DataStore) -> Self {
        Self {
            author: AuthorSelection::All,
            file_types: store.file_types().iter().cloned().collect(),
        }
    }

    pub fn author(&self) -> &AuthorSelection {
        &self.author
    }

    pub fn selected_file_types(&self) -> &BTreeSet<String> {
        &self.file_types
    }

    pub fn is_selected(&self, file_type: &str) -> bool {
        self.file_types.contains(file_type)
    }

    pub fn select_author(&mut self, author: AuthorSelection) {
        self.author = author;
    }

    pub fn set_file_type(&mut self, file_type: &str, checked: bool) {
        if checked {
            self.file_types.insert(file_type.to_string());
        } else {
            self.file_types.remove(file_type);
        }
    }

    pub fn select_file_types<I, S>(&mut self, file_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_types = file_types.into_iter().map(Into::into).collect();
    }

    pub fn clear_file_types(&mut self) {
        self.file_types.clear();
    }
}
