use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Result, StoreError, read_json, write_json, write_replace};
use crate::config::NOTE_EXTENSION;
use crate::core::note::{Note, NoteId};

/// Title of the note created when the panel would otherwise be empty.
pub const DEFAULT_NOTE_TITLE: &str = "notes";

/// Tab order and selection, stored next to the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesIndex {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Older panels wrote -1 when no tab was open.
    #[serde(default)]
    pub last_active: i64,
}

/// Plain-text notes, one file each, with a small JSON index for tab order.
#[derive(Debug)]
pub struct NotesStore {
    dir: PathBuf,
    index_path: PathBuf,
    order: Vec<NoteId>,
    active: usize,
}

fn check_title(title: &str) -> Result<()> {
    let t = title.trim();
    if t.is_empty() || t == "." || t == ".." || t.contains(['/', '\\']) {
        return Err(StoreError::InvalidName(title.to_string()));
    }
    Ok(())
}

impl NotesStore {
    /// Open the notes directory, creating it if needed. Notes are read by [`load`](Self::load).
    pub fn open(dir: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self {
            dir,
            index_path: index_path.into(),
            order: Vec::new(),
            active: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Note ids in tab order.
    pub fn notes(&self) -> &[NoteId] {
        &self.order
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&NoteId> {
        self.order.get(self.active)
    }

    pub fn path_of(&self, id: &NoteId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Read every note in tab order and adopt that order.
    ///
    /// Files listed in the index but missing on disk are skipped. Without an
    /// index the directory is scanned for note files in name order.
    pub fn load(&mut self) -> Result<Vec<Note>> {
        let (ids, last_active) = match read_json::<NotesIndex>(&self.index_path)? {
            Some(index) => {
                let last_active = usize::try_from(index.last_active)
                    .ok()
                    .and_then(|i| index.files.get(i))
                    .and_then(|p| p.file_name().and_then(|n| n.to_str()))
                    .map(NoteId::from_file_name);
                let ids = index
                    .files
                    .iter()
                    .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
                    .map(NoteId::from_file_name)
                    .collect::<Vec<_>>();
                (ids, last_active)
            }
            None => {
                log::warn!(
                    "No notes index at {}; restoring tabs in file name order",
                    self.index_path.display()
                );
                (self.scan_dir()?, None)
            }
        };

        let mut seen = HashSet::new();
        let mut notes = Vec::new();
        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            let path = self.path_of(&id);
            match fs::read_to_string(&path) {
                Ok(content) => notes.push(Note::new(id, content)),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("Skipping missing note {}", path.display());
                }
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }

        self.order = notes.iter().map(|n| n.id.clone()).collect();
        // Follow the last active note by id; files dropped above shift positions.
        self.active = last_active
            .and_then(|id| self.order.iter().position(|n| *n == id))
            .unwrap_or(0);
        log::debug!("Loaded {} notes from {}", notes.len(), self.dir.display());
        Ok(notes)
    }

    fn scan_dir(&self) -> Result<Vec<NoteId>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let mut ids: Vec<NoteId> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(NoteId::from_file_name)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Create an empty note named after `title` and append it to the tab order.
    pub fn create(&mut self, title: &str) -> Result<NoteId> {
        check_title(title)?;
        let id = NoteId::from_title(title);
        if self.order.contains(&id) {
            return Err(StoreError::Conflict(id.to_string()));
        }
        let path = self.path_of(&id);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::Conflict(id.to_string()));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        }
        self.order.push(id.clone());
        log::debug!("Created note {}", path.display());
        self.save_index()?;
        Ok(id)
    }

    pub fn read(&self, id: &NoteId) -> Result<String> {
        self.ensure_known(id)?;
        let path = self.path_of(id);
        fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    /// Replace the whole content of a note. Called on every edit, so no fsync.
    pub fn write(&self, id: &NoteId, content: &str) -> Result<()> {
        self.ensure_known(id)?;
        write_replace(&self.path_of(id), content.as_bytes())
    }

    /// Remove a note. A file that is already gone only produces a warning.
    pub fn delete(&mut self, id: &NoteId) -> Result<()> {
        let pos = self
            .order
            .iter()
            .position(|n| n == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let path = self.path_of(id);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Note file {} does not exist", path.display());
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        }

        self.order.remove(pos);
        if pos < self.active {
            self.active -= 1;
        }
        self.active = self.active.min(self.order.len().saturating_sub(1));
        log::debug!("Deleted note {}", path.display());
        self.save_index()
    }

    /// Select a tab and persist the selection. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.order.len() || index == self.active {
            return Ok(());
        }
        self.active = index;
        self.save_index()
    }

    pub fn save_index(&self) -> Result<()> {
        let index = NotesIndex {
            files: self.order.iter().map(|id| self.path_of(id)).collect(),
            last_active: self.active as i64,
        };
        write_json(&self.index_path, &index)
    }

    /// Create the default note when there are none.
    pub fn ensure_default(&mut self) -> Result<Option<NoteId>> {
        if !self.order.is_empty() {
            return Ok(None);
        }
        self.create(DEFAULT_NOTE_TITLE).map(Some)
    }

    fn ensure_known(&self, id: &NoteId) -> Result<()> {
        if self.order.contains(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }
}
