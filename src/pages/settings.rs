use cosmic::iced::{Alignment, Length};
use cosmic::widget::{column, container, row, scrollable, text, text_input};
use cosmic::Element;

use perch::config::PerchConfig;

use crate::message::{CommandKind, Message};

pub fn settings_view(config: &PerchConfig) -> Element<'_, Message> {
    let mut content = column().spacing(12);

    // --- Debug logging ---
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(crate::fl!("settings-debug-logging")).width(Length::Fill))
            .push(
                cosmic::widget::toggler(config.debug_logging)
                    .on_toggle(|_| Message::ToggleDebugLogging),
            ),
    );

    // --- Openers ---
    content = content.push(text::title4(crate::fl!("settings-browser")));
    content = content.push(
        text_input::text_input("xdg-open", &config.browser_command)
            .on_input(|v| Message::SetCommand(CommandKind::Browser, v))
            .width(Length::Fill),
    );

    content = content.push(text::title4(crate::fl!("settings-file-opener")));
    content = content.push(
        text_input::text_input("xdg-open", &config.file_open_command)
            .on_input(|v| Message::SetCommand(CommandKind::FileOpen, v))
            .width(Length::Fill),
    );

    // --- Storage ---
    content = content.push(text::title4(crate::fl!("settings-data-directory")));
    content = content.push(text::body(config.data_directory.display().to_string()));

    container(scrollable(content.padding(16)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
