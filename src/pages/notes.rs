use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, flex_row, icon, row, text, text_editor};
use cosmic::Element;

use perch::core::note::NoteId;

use crate::components::task_row::confirm_row;
use crate::fl;
use crate::message::{FormKind, Message, PendingDelete};

fn tab_button<'a>(id: &NoteId, index: usize, active: bool) -> Element<'a, Message> {
    let label = id.title().to_string();
    let select = if active {
        button::suggested(label)
    } else {
        button::standard(label)
    };

    row()
        .spacing(2)
        .align_y(Alignment::Center)
        .push(select.on_press(Message::SelectNote(index)))
        .push(
            button::icon(icon::from_name("window-close-symbolic"))
                .on_press(Message::ConfirmDelete(PendingDelete::Note(id.clone()))),
        )
        .into()
}

pub fn notes_view<'a>(
    notes: &[NoteId],
    active: usize,
    editor: &'a text_editor::Content,
    pending_delete: Option<&PendingDelete>,
) -> Element<'a, Message> {
    let mut tabs: Vec<Element<'a, Message>> = notes
        .iter()
        .enumerate()
        .map(|(i, id)| tab_button(id, i, i == active))
        .collect();
    tabs.push(
        button::icon(icon::from_name("tab-new-symbolic"))
            .on_press(Message::OpenForm(FormKind::NewNote))
            .into(),
    );

    let mut content = column()
        .spacing(12)
        .push(flex_row(tabs).row_spacing(4).column_spacing(4));

    if let Some(PendingDelete::Note(id)) = pending_delete {
        content = content.push(confirm_row(
            fl!("confirm-delete-note", note = id.file_name().to_string()),
            PendingDelete::Note(id.clone()),
        ));
    }

    if notes.is_empty() {
        content = content.push(
            container(text::body(fl!("notes-empty")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        content = content.push(
            container(
                text_editor(editor)
                    .on_action(Message::NoteEditorAction)
                    .height(Length::Fill),
            )
            .width(Length::Fill)
            .height(Length::Fill),
        );
    }

    container(content.padding(16))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
