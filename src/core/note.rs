use std::fmt;

use crate::config::NOTE_EXTENSION;

/// File name of a note inside the notes directory, e.g. `groceries.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

impl NoteId {
    /// Derive the id from a user-entered title.
    pub fn from_title(title: &str) -> Self {
        Self(format!("{}.{}", title.trim(), NOTE_EXTENSION))
    }

    /// Wrap an existing file name.
    pub fn from_file_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn file_name(&self) -> &str {
        &self.0
    }

    /// Tab label: the file name without its extension.
    pub fn title(&self) -> &str {
        self.0
            .strip_suffix(NOTE_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
}

impl Note {
    pub fn new(id: NoteId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_title() {
        let id = NoteId::from_title("  groceries ");
        assert_eq!(id.file_name(), "groceries.txt");
        assert_eq!(id.title(), "groceries");
    }

    #[test]
    fn title_of_foreign_name_is_unchanged() {
        assert_eq!(NoteId::from_file_name("readme").title(), "readme");
    }
}
