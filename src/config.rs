use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_VERSION: u64 = 1;

/// Extension of every note file in the notes directory.
pub const NOTE_EXTENSION: &str = "txt";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("perch")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct PerchConfig {
    pub data_directory: PathBuf,
    pub browser_command: String,
    pub file_open_command: String,
    pub debug_logging: bool,
}

impl Default for PerchConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            browser_command: "xdg-open".into(),
            file_open_command: "xdg-open".into(),
            debug_logging: false,
        }
    }
}

impl PerchConfig {
    /// Config rooted at an explicit data directory, with default commands.
    pub fn with_data_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_directory: dir.into(),
            ..Self::default()
        }
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_directory.join("tasks.json")
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.data_directory.join("notes")
    }

    pub fn notes_index_path(&self) -> PathBuf {
        self.notes_dir().join("config.json")
    }

    /// Ensure the data and notes directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)?;
        std::fs::create_dir_all(self.notes_dir())
    }
}
