use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text};
use cosmic::Element;

use perch::core::group::Group;

use crate::components::task_row::{confirm_row, task_row};
use crate::fl;
use crate::message::{FormKind, Message, PendingDelete};

fn group_header(group: &Group, edit_mode: bool) -> Element<'static, Message> {
    let name = group.name.clone();
    let mut header = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(text::title3(name.clone()));

    if edit_mode {
        header = header
            .push(
                button::icon(icon::from_name("list-add-symbolic"))
                    .on_press(Message::OpenForm(FormKind::NewTask(name.clone()))),
            )
            .push(
                button::icon(icon::from_name("document-edit-symbolic"))
                    .on_press(Message::OpenForm(FormKind::EditGroup(name.clone()))),
            )
            .push(
                button::icon(icon::from_name("edit-delete-symbolic"))
                    .on_press(Message::ConfirmDelete(PendingDelete::Group(name))),
            );
    }

    header.into()
}

pub fn tasks_view(
    groups: &[Group],
    edit_mode: bool,
    pending_delete: Option<&PendingDelete>,
) -> Element<'static, Message> {
    let mut content = column().spacing(12);

    if groups.is_empty() {
        content = content.push(
            container(text::body(fl!("tasks-empty")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    }

    for group in groups {
        let mut group_col = column().spacing(6).push(group_header(group, edit_mode));

        if pending_delete == Some(&PendingDelete::Group(group.name.clone())) {
            group_col = group_col.push(confirm_row(
                fl!("confirm-delete-group", group = group.name.clone()),
                PendingDelete::Group(group.name.clone()),
            ));
        }

        for task in &group.tasks {
            let confirming = matches!(
                pending_delete,
                Some(PendingDelete::Task(g, t)) if *g == group.name && *t == task.name
            );
            group_col = group_col.push(task_row(&group.name, task, edit_mode, confirming));
        }

        content = content.push(group_col);
    }

    // Editors are hidden outside edit mode, including the add-group row.
    if edit_mode {
        content = content.push(
            row()
                .spacing(8)
                .align_y(Alignment::Center)
                .push(text::title3(fl!("tasks-add-group")))
                .push(
                    button::icon(icon::from_name("list-add-symbolic"))
                        .on_press(Message::OpenForm(FormKind::NewGroup)),
                ),
        );
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
