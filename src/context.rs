use serde_json::json;

use crate::config::PerchConfig;
use crate::core::note::Note;
use crate::launch::{LaunchError, Opener, launch_task};
use crate::store::notes::NotesStore;
use crate::store::tasks::TaskStore;
use crate::store::{Result, StoreError};

/// Setting key holding the last window position as `[x, y]`.
pub const POSITION_KEY: &str = "position";

/// Everything the UI needs: both stores, the config and the opener.
pub struct AppContext {
    pub config: PerchConfig,
    pub tasks: TaskStore,
    pub notes: NotesStore,
    opener: Box<dyn Opener>,
    /// Latest window position not yet written to the task document.
    moved_to: Option<(i64, i64)>,
}

impl AppContext {
    /// Open both stores under the configured data directory and load the notes.
    pub fn open(config: PerchConfig, opener: Box<dyn Opener>) -> Result<(Self, Vec<Note>)> {
        config
            .ensure_dirs()
            .map_err(|e| StoreError::io(&config.data_directory, e))?;

        let tasks = TaskStore::open(config.tasks_path())?;
        let mut notes = NotesStore::open(config.notes_dir(), config.notes_index_path())?;
        let mut loaded = notes.load()?;
        if let Some(id) = notes.ensure_default()? {
            loaded.push(Note::new(id, String::new()));
        }

        log::info!(
            "Opened {} groups and {} notes in {}",
            tasks.groups().len(),
            loaded.len(),
            config.data_directory.display()
        );

        Ok((
            Self {
                config,
                tasks,
                notes,
                opener,
                moved_to: None,
            },
            loaded,
        ))
    }

    pub fn set_opener(&mut self, opener: Box<dyn Opener>) {
        self.opener = opener;
    }

    /// Run a task's action.
    pub fn launch(&self, group: &str, task: &str) -> Result<Vec<LaunchError>> {
        let task = self.tasks.task(group, task)?;
        Ok(launch_task(task, self.opener.as_ref()))
    }

    pub fn window_position(&self) -> Option<(f32, f32)> {
        if let Some((x, y)) = self.moved_to {
            return Some((x as f32, y as f32));
        }
        let pos = self.tasks.setting(POSITION_KEY)?.as_array()?;
        match pos.as_slice() {
            [x, y] => Some((x.as_f64()? as f32, y.as_f64()? as f32)),
            _ => None,
        }
    }

    pub fn set_window_position(&mut self, x: f32, y: f32) -> Result<()> {
        self.window_moved(x, y);
        self.flush_window_position()
    }

    /// Remember a move without touching disk. Drags report many of these.
    pub fn window_moved(&mut self, x: f32, y: f32) {
        self.moved_to = Some((x.round() as i64, y.round() as i64));
    }

    /// Write the last remembered move, if any.
    pub fn flush_window_position(&mut self) -> Result<()> {
        let Some((x, y)) = self.moved_to else {
            return Ok(());
        };
        self.tasks.set_setting(POSITION_KEY, json!([x, y]))?;
        self.moved_to = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskPatch;
    use crate::launch::tests::RecordingOpener;

    fn open(dir: &std::path::Path) -> (AppContext, Vec<Note>) {
        let config = PerchConfig::with_data_directory(dir);
        AppContext::open(config, Box::new(RecordingOpener::default())).unwrap()
    }

    #[test]
    fn first_open_creates_default_note() {
        let tmp = tempfile::tempdir().unwrap();
        let (ctx, notes) = open(tmp.path());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id.title(), "notes");
        assert!(ctx.config.notes_dir().join("notes.txt").exists());
        assert!(ctx.tasks.list_groups().is_empty());
    }

    #[test]
    fn two_contexts_are_independent() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let (mut ctx_a, _) = open(a.path());
        let (ctx_b, _) = open(b.path());
        ctx_a.tasks.add_group("Only in A").unwrap();
        assert!(ctx_b.tasks.list_groups().is_empty());
    }

    #[test]
    fn window_position_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut ctx, _) = open(tmp.path());
        assert_eq!(ctx.window_position(), None);
        ctx.set_window_position(120.4, 80.6).unwrap();

        let (reopened, _) = open(tmp.path());
        assert_eq!(reopened.window_position(), Some((120.0, 81.0)));
    }

    #[test]
    fn window_moves_are_written_on_flush() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut ctx, _) = open(tmp.path());
        ctx.window_moved(10.0, 10.0);
        ctx.window_moved(300.2, 40.7);
        assert_eq!(ctx.window_position(), Some((300.0, 41.0)));
        assert_eq!(ctx.tasks.setting(POSITION_KEY), None);

        ctx.flush_window_position().unwrap();
        assert_eq!(ctx.tasks.setting(POSITION_KEY), Some(&json!([300, 41])));
        let (reopened, _) = open(tmp.path());
        assert_eq!(reopened.window_position(), Some((300.0, 41.0)));
    }

    #[test]
    fn failed_flush_keeps_pending_position() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut ctx, _) = open(tmp.path());
        ctx.window_moved(5.0, 6.0);
        std::fs::remove_dir_all(tmp.path()).unwrap();
        assert!(matches!(ctx.flush_window_position(), Err(StoreError::Io { .. })));
        assert_eq!(ctx.window_position(), Some((5.0, 6.0)));
    }

    #[test]
    fn launch_unknown_task_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut ctx, _) = open(tmp.path());
        ctx.tasks.add_group("G").unwrap();
        ctx.tasks.add_task("G", "t").unwrap();
        ctx.tasks
            .edit_task("G", "t", None, TaskPatch::default().url("https://a"))
            .unwrap();
        assert!(ctx.launch("G", "t").unwrap().is_empty());
        assert!(matches!(ctx.launch("G", "nope"), Err(StoreError::NotFound(_))));
    }
}
