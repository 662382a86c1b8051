use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, text};
use cosmic::{Element, theme};

use perch::core::task::Task;

use crate::fl;
use crate::message::{FormKind, Message, PendingDelete};

// Indent of task rows under their group heading
const TASK_INDENT: u16 = 16;

/// Inline "Delete?" prompt with confirm and cancel buttons.
pub fn confirm_row(prompt: String, target: PendingDelete) -> Element<'static, Message> {
    container(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(prompt).width(Length::Fill))
            .push(button::destructive(fl!("delete")).on_press(Message::Delete(target)))
            .push(button::standard(fl!("cancel")).on_press(Message::CancelDelete)),
    )
    .padding([4, 8])
    .class(theme::Container::Card)
    .into()
}

/// One task: name, optional action button and, in edit mode, edit/delete controls.
pub fn task_row(
    group: &str,
    task: &Task,
    edit_mode: bool,
    confirming_delete: bool,
) -> Element<'static, Message> {
    let mut task_line = row()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text::body(task.name.clone()));

    // A label alone is not enough; there must be something to open.
    if let Some(ref label) = task.button_text {
        if task.has_action() {
            task_line = task_line.push(
                button::standard(label.clone())
                    .on_press(Message::LaunchTask(group.to_string(), task.name.clone())),
            );
        }
    }

    if edit_mode {
        task_line = task_line
            .push(
                button::icon(icon::from_name("document-edit-symbolic")).on_press(
                    Message::OpenForm(FormKind::EditTask(group.to_string(), task.name.clone())),
                ),
            )
            .push(
                button::icon(icon::from_name("edit-delete-symbolic")).on_press(
                    Message::ConfirmDelete(PendingDelete::Task(
                        group.to_string(),
                        task.name.clone(),
                    )),
                ),
            );
    }

    let mut col = column()
        .spacing(4)
        .padding([0, 0, 0, TASK_INDENT])
        .push(task_line);

    if confirming_delete {
        col = col.push(confirm_row(
            fl!("confirm-delete-task", task = task.name.clone(), group = group.to_string()),
            PendingDelete::Task(group.to_string(), task.name.clone()),
        ));
    }

    col.into()
}
