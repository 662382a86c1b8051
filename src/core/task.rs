use serde::{Deserialize, Serialize};

/// A launcher entry. The action button is shown only when `button_text` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub button_text: Option<String>,
    /// Comma-separated list of URLs.
    pub url: Option<String>,
    pub file_path: Option<String>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            button_text: None,
            url: None,
            file_path: None,
        }
    }

    /// Individual URLs from the comma-separated `url` field, trimmed, empties dropped.
    pub fn urls(&self) -> Vec<&str> {
        self.url
            .as_deref()
            .map(|u| u.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn has_action(&self) -> bool {
        !self.urls().is_empty() || self.file_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn property(&self, field: TaskField) -> Option<&str> {
        match field {
            TaskField::ButtonText => self.button_text.as_deref(),
            TaskField::Url => self.url.as_deref(),
            TaskField::FilePath => self.file_path.as_deref(),
        }
    }

    /// Apply only the properties present in `patch`.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(button_text) = patch.button_text {
            self.button_text = button_text;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(file_path) = patch.file_path {
            self.file_path = file_path;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    ButtonText,
    Url,
    FilePath,
}

impl TaskField {
    pub const ALL: &'static [TaskField] = &[Self::ButtonText, Self::Url, Self::FilePath];

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::ButtonText => "button_text",
            Self::Url => "url",
            Self::FilePath => "file_path",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "button_text" => Some(Self::ButtonText),
            "url" => Some(Self::Url),
            "file_path" => Some(Self::FilePath),
            _ => None,
        }
    }
}

/// Partial task update. The outer `Option` says whether a property is supplied;
/// a supplied `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub button_text: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub file_path: Option<Option<String>>,
}

impl TaskPatch {
    /// Patch that sets every property, treating blank strings as absent.
    pub fn from_form(button_text: &str, url: &str, file_path: &str) -> Self {
        fn field(s: &str) -> Option<Option<String>> {
            let s = s.trim();
            Some(if s.is_empty() { None } else { Some(s.to_string()) })
        }
        Self {
            button_text: field(button_text),
            url: field(url),
            file_path: field(file_path),
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(Some(url.into()));
        self
    }

    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = Some(Some(text.into()));
        self
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(Some(path.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_split_and_trim() {
        let task = Task {
            url: Some("https://a.example, https://b.example ,, ".into()),
            ..Task::new("t")
        };
        assert_eq!(task.urls(), vec!["https://a.example", "https://b.example"]);
        assert!(task.has_action());
    }

    #[test]
    fn no_url_no_file_means_no_action() {
        assert!(!Task::new("t").has_action());
    }

    #[test]
    fn apply_leaves_unsupplied_fields() {
        let mut task = Task {
            button_text: Some("Go".into()),
            ..Task::new("t")
        };
        task.apply(TaskPatch::default().url("http://a"));
        assert_eq!(task.url.as_deref(), Some("http://a"));
        assert_eq!(task.button_text.as_deref(), Some("Go"));

        task.apply(TaskPatch {
            button_text: Some(None),
            ..TaskPatch::default()
        });
        assert_eq!(task.button_text, None);
        assert_eq!(task.url.as_deref(), Some("http://a"));
    }

    #[test]
    fn form_patch_clears_blank_fields() {
        let patch = TaskPatch::from_form("Open", "  ", "/tmp/x.pdf");
        assert_eq!(patch.button_text, Some(Some("Open".into())));
        assert_eq!(patch.url, Some(None));
        assert_eq!(patch.file_path, Some(Some("/tmp/x.pdf".into())));
    }

    #[test]
    fn field_keys() {
        for field in TaskField::ALL {
            assert_eq!(TaskField::from_key(field.as_key()), Some(*field));
        }
        assert_eq!(TaskField::from_key("colour"), None);
    }
}
