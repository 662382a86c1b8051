//! Print the launcher's groups, tasks, settings and notes without starting the UI.

use perch::config::{CONFIG_VERSION, PerchConfig};
use perch::core::task::TaskField;
use perch::store::notes::NotesStore;
use perch::store::tasks::TaskStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    systemd_journal_logger::JournalLog::new()?
        .with_syslog_identifier("perch-dump".to_string())
        .install()?;
    log::set_max_level(log::LevelFilter::Info);

    let cosmic_cfg = cosmic::cosmic_config::Config::new("dev.perch.app", CONFIG_VERSION)?;
    let config = <PerchConfig as cosmic::cosmic_config::CosmicConfigEntry>::get_entry(&cosmic_cfg)
        .unwrap_or_else(|(_, cfg)| cfg);

    let tasks = TaskStore::open(config.tasks_path())?;
    println!("=== Tasks ({}) ===\n", tasks.path().display());

    for group in tasks.groups() {
        println!("{}", group.name);
        for task in &group.tasks {
            let mut line = format!("  - {}", task.name);
            for field in TaskField::ALL {
                if let Some(value) = task.property(*field) {
                    line.push_str(&format!(" {}={:?}", field.as_key(), value));
                }
            }
            println!("{}", line);
        }
    }

    let settings = &tasks.document().settings;
    if !settings.is_empty() {
        println!("\nSettings:");
        for (key, value) in settings {
            println!("  {} = {}", key, value);
        }
    }

    let mut notes = NotesStore::open(config.notes_dir(), config.notes_index_path())?;
    println!("\n=== Notes ({}) ===\n", notes.dir().display());

    let loaded = notes.load()?;
    for (i, note) in loaded.iter().enumerate() {
        let marker = if i == notes.active_index() { "*" } else { " " };
        let lines = note.content.lines().count();
        println!("{} {} ({} lines, {} bytes)", marker, note.id, lines, note.content.len());
    }

    if loaded.is_empty() {
        println!("(none)");
    }

    Ok(())
}
