use std::process::Command;

use crate::config::PerchConfig;
use crate::core::task::Task;

/// Opens things outside the app.
pub trait Opener {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
    fn open_file(&self, path: &str) -> std::io::Result<()>;
}

/// Spawns the configured browser and file-opener commands.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    pub browser_command: String,
    pub file_open_command: String,
}

impl CommandOpener {
    pub fn from_config(config: &PerchConfig) -> Self {
        Self {
            browser_command: config.browser_command.clone(),
            file_open_command: config.file_open_command.clone(),
        }
    }
}

impl Opener for CommandOpener {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        Command::new(&self.browser_command).arg(url).spawn().map(|_| ())
    }

    fn open_file(&self, path: &str) -> std::io::Result<()> {
        Command::new(&self.file_open_command).arg(path).spawn().map(|_| ())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to open URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Open every URL of `task`, then its file. Failures do not stop the rest.
pub fn launch_task(task: &Task, opener: &dyn Opener) -> Vec<LaunchError> {
    let mut errors = Vec::new();
    for url in task.urls() {
        log::info!("Opening {}", url);
        if let Err(source) = opener.open_url(url) {
            log::error!("Failed to open URL {}: {}", url, source);
            errors.push(LaunchError::Url {
                url: url.to_string(),
                source,
            });
        }
    }
    if let Some(path) = task.file_path.as_deref().filter(|p| !p.trim().is_empty()) {
        log::info!("Opening {}", path);
        if let Err(source) = opener.open_file(path) {
            log::error!("Failed to open file {}: {}", path, source);
            errors.push(LaunchError::File {
                path: path.to_string(),
                source,
            });
        }
    }
    errors
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls instead of spawning anything.
    #[derive(Default)]
    pub(crate) struct RecordingOpener {
        pub opened: RefCell<Vec<String>>,
        pub fail_on: Option<String>,
    }

    impl Opener for RecordingOpener {
        fn open_url(&self, url: &str) -> std::io::Result<()> {
            if self.fail_on.as_deref() == Some(url) {
                return Err(std::io::Error::other("boom"));
            }
            self.opened.borrow_mut().push(format!("url:{url}"));
            Ok(())
        }

        fn open_file(&self, path: &str) -> std::io::Result<()> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(std::io::Error::other("boom"));
            }
            self.opened.borrow_mut().push(format!("file:{path}"));
            Ok(())
        }
    }

    #[test]
    fn opens_urls_then_file() {
        let opener = RecordingOpener::default();
        let task = Task {
            url: Some("https://a, https://b".into()),
            file_path: Some("/tmp/report.pdf".into()),
            ..Task::new("t")
        };
        assert!(launch_task(&task, &opener).is_empty());
        assert_eq!(
            *opener.opened.borrow(),
            vec!["url:https://a", "url:https://b", "file:/tmp/report.pdf"]
        );
    }

    #[test]
    fn failure_does_not_stop_remaining() {
        let opener = RecordingOpener {
            fail_on: Some("https://a".into()),
            ..RecordingOpener::default()
        };
        let task = Task {
            url: Some("https://a,https://b".into()),
            ..Task::new("t")
        };
        let errors = launch_task(&task, &opener);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LaunchError::Url { .. }));
        assert_eq!(*opener.opened.borrow(), vec!["url:https://b"]);
    }

    #[test]
    fn nothing_to_open() {
        let opener = RecordingOpener::default();
        assert!(launch_task(&Task::new("t"), &opener).is_empty());
        assert!(opener.opened.borrow().is_empty());
    }
}
