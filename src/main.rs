use cosmic::app::Settings;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;

use perch::config::{self, PerchConfig};
use perch::context::AppContext;
use perch::launch::CommandOpener;

use application::{Flags, LaunchMode, Perch};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cosmic_cfg = cosmic::cosmic_config::Config::new("dev.perch.app", config::CONFIG_VERSION)?;
    let config = PerchConfig::get_entry(&cosmic_cfg).unwrap_or_else(|(_, cfg)| cfg);

    // Log to the systemd user journal (`journalctl --user -t perch -f`).
    // Perch targets at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                if metadata.target().starts_with("perch") {
                    let max = if perch::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        let journal = systemd_journal_logger::JournalLog::new()?
            .with_syslog_identifier("perch".to_string());

        perch::set_debug_logging(config.debug_logging);

        log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
        // Global max must be Debug so perch debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }

    localize::localize();

    let launch_mode = if std::env::args().any(|a| a == "--notes") {
        LaunchMode::Notes
    } else {
        LaunchMode::Tasks
    };

    let opener = Box::new(CommandOpener::from_config(&config));
    let (context, notes) = AppContext::open(config, opener).inspect_err(|e| {
        log::error!("Failed to open data directory: {}", e);
    })?;

    let settings = Settings::default()
        .size_limits(Limits::NONE.min_width(360.0).min_height(240.0));

    let flags = Flags {
        context,
        notes,
        cosmic_config: cosmic_cfg,
        launch_mode,
    };
    cosmic::app::run::<Perch>(settings, flags)?;

    Ok(())
}
