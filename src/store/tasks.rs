use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Result, StoreError, read_json, write_json};
use crate::core::group::Group;
use crate::core::task::{Task, TaskField, TaskPatch};

/// On-disk layout of `tasks.json`. Groups are an array so their order
/// survives any JSON implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

/// Groups of launcher tasks plus window settings, mirrored to one JSON file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    doc: TaskDocument,
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl TaskStore {
    /// Load the document at `path`, or start empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = read_json::<TaskDocument>(&path)?.unwrap_or_default();
        log::debug!(
            "Loaded {} groups from {}",
            doc.groups.len(),
            path.display()
        );
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn groups(&self) -> &[Group] {
        &self.doc.groups
    }

    pub fn document(&self) -> &TaskDocument {
        &self.doc
    }

    pub fn list_groups(&self) -> Vec<&str> {
        self.doc.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn list_tasks(&self, group: &str) -> Result<Vec<&str>> {
        Ok(self.group(group)?.task_names())
    }

    pub fn group(&self, name: &str) -> Result<&Group> {
        self.doc
            .groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn task(&self, group: &str, name: &str) -> Result<&Task> {
        self.group(group)?
            .task(name)
            .ok_or_else(|| StoreError::NotFound(format!("{group}/{name}")))
    }

    pub fn task_property(&self, group: &str, name: &str, key: &str) -> Result<Option<&str>> {
        let field =
            TaskField::from_key(key).ok_or_else(|| StoreError::InvalidName(key.to_string()))?;
        Ok(self.task(group, name)?.property(field))
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.doc.settings.get(key)
    }

    pub fn add_group(&mut self, name: &str) -> Result<()> {
        check_name(name)?;
        if self.group_index(name).is_some() {
            return Err(StoreError::Conflict(name.to_string()));
        }
        let mut doc = self.doc.clone();
        doc.groups.push(Group::new(name));
        self.commit(doc)?;
        log::debug!("Added group '{}'", name);
        Ok(())
    }

    /// Rename a group in place, keeping its position and tasks.
    pub fn edit_group(&mut self, name: &str, new_name: &str) -> Result<()> {
        check_name(new_name)?;
        let idx = self
            .group_index(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if name == new_name {
            return Ok(());
        }
        if self.group_index(new_name).is_some() {
            return Err(StoreError::Conflict(new_name.to_string()));
        }
        let mut doc = self.doc.clone();
        doc.groups[idx].name = new_name.to_string();
        self.commit(doc)?;
        log::debug!("Renamed group '{}' to '{}'", name, new_name);
        Ok(())
    }

    pub fn delete_group(&mut self, name: &str) -> Result<()> {
        let idx = self
            .group_index(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let mut doc = self.doc.clone();
        let removed = doc.groups.remove(idx);
        self.commit(doc)?;
        log::debug!("Deleted group '{}' with {} tasks", name, removed.tasks.len());
        Ok(())
    }

    pub fn add_task(&mut self, group: &str, name: &str) -> Result<()> {
        self.add_task_with(group, name, TaskPatch::default())
    }

    /// Append a task with its properties already set, in a single write.
    pub fn add_task_with(&mut self, group: &str, name: &str, patch: TaskPatch) -> Result<()> {
        check_name(name)?;
        let gi = self
            .group_index(group)
            .ok_or_else(|| StoreError::NotFound(group.to_string()))?;
        if self.doc.groups[gi].task(name).is_some() {
            return Err(StoreError::Conflict(format!("{group}/{name}")));
        }
        let mut task = Task::new(name);
        task.apply(patch);
        let mut doc = self.doc.clone();
        doc.groups[gi].tasks.push(task);
        self.commit(doc)?;
        log::debug!("Added task '{}' to '{}'", name, group);
        Ok(())
    }

    /// Rename and/or patch a task. Properties absent from `patch` are kept.
    pub fn edit_task(
        &mut self,
        group: &str,
        name: &str,
        new_name: Option<&str>,
        patch: TaskPatch,
    ) -> Result<()> {
        let gi = self
            .group_index(group)
            .ok_or_else(|| StoreError::NotFound(group.to_string()))?;
        let existing = &self.doc.groups[gi];
        let ti = existing
            .tasks
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("{group}/{name}")))?;
        if let Some(new_name) = new_name {
            check_name(new_name)?;
            if new_name != name && existing.task(new_name).is_some() {
                return Err(StoreError::Conflict(format!("{group}/{new_name}")));
            }
        }

        let mut doc = self.doc.clone();
        let task = &mut doc.groups[gi].tasks[ti];
        if let Some(new_name) = new_name {
            task.name = new_name.to_string();
        }
        task.apply(patch);
        self.commit(doc)?;
        log::debug!("Edited task '{}' in '{}'", name, group);
        Ok(())
    }

    pub fn delete_task(&mut self, group: &str, name: &str) -> Result<()> {
        let gi = self
            .group_index(group)
            .ok_or_else(|| StoreError::NotFound(group.to_string()))?;
        let ti = self.doc.groups[gi]
            .tasks
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("{group}/{name}")))?;
        let mut doc = self.doc.clone();
        doc.groups[gi].tasks.remove(ti);
        self.commit(doc)?;
        log::debug!("Deleted task '{}' from '{}'", name, group);
        Ok(())
    }

    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<()> {
        if self.doc.settings.get(key) == Some(&value) {
            return Ok(());
        }
        let mut doc = self.doc.clone();
        doc.settings.insert(key.to_string(), value);
        self.commit(doc)
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.doc.groups.iter().position(|g| g.name == name)
    }

    fn commit(&mut self, doc: TaskDocument) -> Result<()> {
        if let Err(e) = write_json(&self.path, &doc) {
            log::error!("Failed to save tasks: {}", e);
            return Err(e);
        }
        self.doc = doc;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, TaskStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = TaskStore::open(tmp.path().join("tasks.json")).unwrap();
        (tmp, store)
    }

    #[test]
    fn groups_keep_insertion_order() {
        let (_tmp, mut store) = store();
        store.add_group("Zeta").unwrap();
        store.add_group("Alpha").unwrap();
        assert_eq!(store.list_groups(), vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn duplicate_group_conflicts() {
        let (_tmp, mut store) = store();
        store.add_group("X").unwrap();
        let err = store.add_group("X").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_groups(), vec!["X"]);
    }

    #[test]
    fn group_names_are_case_sensitive() {
        let (_tmp, mut store) = store();
        store.add_group("x").unwrap();
        store.add_group("X").unwrap();
        assert_eq!(store.list_groups(), vec!["x", "X"]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let (_tmp, mut store) = store();
        assert!(matches!(store.add_group("  "), Err(StoreError::InvalidName(_))));
        assert!(store.list_groups().is_empty());
    }

    #[test]
    fn partial_edit_keeps_other_properties() {
        let (_tmp, mut store) = store();
        store.add_group("X").unwrap();
        store.add_task("X", "t1").unwrap();
        store
            .edit_task("X", "t1", None, TaskPatch::default().url("http://a"))
            .unwrap();
        assert_eq!(store.task_property("X", "t1", "url").unwrap(), Some("http://a"));
        assert_eq!(store.task_property("X", "t1", "button_text").unwrap(), None);
    }

    #[test]
    fn unknown_property_key_is_rejected() {
        let (_tmp, mut store) = store();
        store.add_group("X").unwrap();
        store.add_task("X", "t1").unwrap();
        assert!(matches!(
            store.task_property("X", "t1", "colour"),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn delete_group_removes_tasks() {
        let (_tmp, mut store) = store();
        store.add_group("X").unwrap();
        store.add_task("X", "a").unwrap();
        store.add_task("X", "b").unwrap();
        store.delete_group("X").unwrap();
        assert!(matches!(store.list_tasks("X"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_group("X"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn rename_group_preserves_position_and_tasks() {
        let (_tmp, mut store) = store();
        store.add_group("A").unwrap();
        store.add_group("B").unwrap();
        store.add_group("C").unwrap();
        store.add_task("B", "one").unwrap();
        store.add_task("B", "two").unwrap();

        store.edit_group("B", "Bee").unwrap();
        assert_eq!(store.list_groups(), vec!["A", "Bee", "C"]);
        assert_eq!(store.list_tasks("Bee").unwrap(), vec!["one", "two"]);

        assert!(matches!(store.edit_group("Bee", "C"), Err(StoreError::Conflict(_))));
        assert!(matches!(store.edit_group("Nope", "D"), Err(StoreError::NotFound(_))));
        store.edit_group("Bee", "Bee").unwrap();
    }

    #[test]
    fn task_rename_conflict_and_position() {
        let (_tmp, mut store) = store();
        store.add_group("G").unwrap();
        store.add_task("G", "a").unwrap();
        store.add_task("G", "b").unwrap();
        store.add_task("G", "c").unwrap();
        assert!(matches!(store.add_task("G", "a"), Err(StoreError::Conflict(_))));
        assert!(matches!(store.add_task("H", "a"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.edit_task("G", "b", Some("c"), TaskPatch::default()),
            Err(StoreError::Conflict(_))
        ));

        store
            .edit_task("G", "b", Some("bee"), TaskPatch::default().button_text("Open"))
            .unwrap();
        assert_eq!(store.list_tasks("G").unwrap(), vec!["a", "bee", "c"]);
        assert_eq!(store.task("G", "bee").unwrap().button_text.as_deref(), Some("Open"));

        store.delete_task("G", "a").unwrap();
        assert_eq!(store.list_tasks("G").unwrap(), vec!["bee", "c"]);
        assert!(matches!(store.delete_task("G", "a"), Err(StoreError::NotFound(_))));
    }

    fn on_disk(tmp: &tempfile::TempDir) -> String {
        std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap()
    }

    #[test]
    fn edit_task_missing_group_or_task_is_not_found() {
        let (tmp, mut store) = store();
        store.add_group("G").unwrap();
        store.add_task("G", "t").unwrap();
        let before = on_disk(&tmp);

        assert!(matches!(
            store.edit_task("H", "t", None, TaskPatch::default().url("https://a")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.edit_task("G", "missing", Some("x"), TaskPatch::default()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.task_property("G", "missing", "url"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.task_property("H", "t", "url"),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(on_disk(&tmp), before);
        assert_eq!(store.task_property("G", "t", "url").unwrap(), None);
    }

    #[test]
    fn blank_rename_is_invalid() {
        let (tmp, mut store) = store();
        store.add_group("G").unwrap();
        store.add_task("G", "t").unwrap();
        let before = on_disk(&tmp);

        assert!(matches!(store.edit_group("G", ""), Err(StoreError::InvalidName(_))));
        assert!(matches!(store.edit_group("G", "  "), Err(StoreError::InvalidName(_))));
        assert!(matches!(
            store.edit_task("G", "t", Some(" "), TaskPatch::default()),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(store.add_task("G", ""), Err(StoreError::InvalidName(_))));
        assert_eq!(on_disk(&tmp), before);
        assert_eq!(store.list_groups(), vec!["G"]);
        assert_eq!(store.list_tasks("G").unwrap(), vec!["t"]);
    }

    #[test]
    fn add_task_with_properties_is_one_write() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        std::fs::create_dir(&dir).unwrap();
        let mut store = TaskStore::open(dir.join("tasks.json")).unwrap();
        store.add_group("G").unwrap();
        store
            .add_task_with("G", "t", TaskPatch::default().button_text("Go").url("https://a"))
            .unwrap();
        assert_eq!(store.task_property("G", "t", "button_text").unwrap(), Some("Go"));

        let reloaded = TaskStore::open(dir.join("tasks.json")).unwrap();
        assert_eq!(reloaded.task_property("G", "t", "url").unwrap(), Some("https://a"));

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(
            store.add_task_with("G", "u", TaskPatch::default().url("https://b")),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.list_tasks("G").unwrap(), vec!["t"]);
    }

    #[test]
    fn document_round_trips() {
        let (tmp, mut store) = store();
        store.add_group("Work").unwrap();
        store.add_group("Home").unwrap();
        store.add_task("Work", "Mail").unwrap();
        store.add_task("Work", "Docs").unwrap();
        store.add_task("Home", "Plants").unwrap();
        store
            .edit_task(
                "Work",
                "Mail",
                None,
                TaskPatch::default()
                    .button_text("Open")
                    .url("https://a, https://b"),
            )
            .unwrap();
        store
            .edit_task("Home", "Plants", None, TaskPatch::default().file_path("/tmp/plants.ods"))
            .unwrap();
        store.set_setting("position", json!([120, 80])).unwrap();

        let reloaded = TaskStore::open(tmp.path().join("tasks.json")).unwrap();
        assert_eq!(reloaded.document(), store.document());
        assert_eq!(reloaded.list_groups(), vec!["Work", "Home"]);
        assert_eq!(reloaded.list_tasks("Work").unwrap(), vec!["Mail", "Docs"]);
        assert_eq!(reloaded.task_property("Work", "Docs", "url").unwrap(), None);
        assert_eq!(reloaded.setting("position"), Some(&json!([120, 80])));
    }

    #[test]
    fn absent_properties_are_written_as_null() {
        let (tmp, mut store) = store();
        store.add_group("G").unwrap();
        store.add_task("G", "t").unwrap();
        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("tasks.json")).unwrap())
                .unwrap();
        assert_eq!(raw["groups"][0]["tasks"][0]["url"], Value::Null);
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        std::fs::create_dir(&dir).unwrap();
        let mut store = TaskStore::open(dir.join("tasks.json")).unwrap();
        store.add_group("Kept").unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(store.add_group("Lost"), Err(StoreError::Io { .. })));
        assert_eq!(store.list_groups(), vec!["Kept"]);
    }

    #[test]
    fn missing_document_opens_empty() {
        let (_tmp, store) = store();
        assert!(store.list_groups().is_empty());
        assert_eq!(store.setting("position"), None);
    }
}
