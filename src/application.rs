use cosmic::app::{Core, Task as CosmicTask, context_drawer};
use cosmic::iced::{Alignment, Length, Point};
use cosmic::widget::{button, column, container, icon, nav_bar, row, scrollable, text, text_editor, text_input};
use cosmic::{Application, Element, executor, theme};

use perch::context::AppContext;
use perch::core::note::Note;
use perch::core::task::TaskPatch;
use perch::launch::CommandOpener;
use perch::store::StoreError;

use crate::fl;
use crate::message::{CommandKind, FormField, FormKind, Message, Page, PendingDelete};
use crate::pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Tasks,
    Notes,
}

/// Fields of the group/task/note form shown in the context drawer.
pub struct Form {
    pub kind: FormKind,
    pub name: String,
    pub button_text: String,
    pub url: String,
    pub file_path: String,
}

impl Form {
    fn new(kind: FormKind, ctx: &AppContext) -> Self {
        let mut form = Self {
            kind,
            name: String::new(),
            button_text: String::new(),
            url: String::new(),
            file_path: String::new(),
        };
        match &form.kind {
            FormKind::EditGroup(group) => form.name = group.clone(),
            FormKind::EditTask(group, name) => {
                if let Ok(task) = ctx.tasks.task(group, name) {
                    form.name = task.name.clone();
                    form.button_text = task.button_text.clone().unwrap_or_default();
                    form.url = task.url.clone().unwrap_or_default();
                    form.file_path = task.file_path.clone().unwrap_or_default();
                }
            }
            FormKind::NewGroup | FormKind::NewTask(_) | FormKind::NewNote => {}
        }
        form
    }

    fn has_task_fields(&self) -> bool {
        matches!(self.kind, FormKind::NewTask(_) | FormKind::EditTask(..))
    }

    fn title(&self) -> String {
        match self.kind {
            FormKind::NewGroup => fl!("form-new-group"),
            FormKind::EditGroup(_) => fl!("form-edit-group"),
            FormKind::NewTask(_) => fl!("form-new-task"),
            FormKind::EditTask(..) => fl!("form-edit-task"),
            FormKind::NewNote => fl!("form-new-note"),
        }
    }

    fn patch(&self) -> TaskPatch {
        TaskPatch::from_form(&self.button_text, &self.url, &self.file_path)
    }
}

pub struct Perch {
    core: Core,
    nav_model: nav_bar::Model,
    cosmic_config: cosmic::cosmic_config::Config,
    ctx: AppContext,
    page: Page,

    // UI state
    edit_mode: bool,
    form: Option<Form>,
    pending_delete: Option<PendingDelete>,
    note_editor: text_editor::Content,
    error: Option<String>,
}

pub struct Flags {
    pub context: AppContext,
    pub notes: Vec<Note>,
    pub cosmic_config: cosmic::cosmic_config::Config,
    pub launch_mode: LaunchMode,
}

impl Application for Perch {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.perch.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let Flags {
            context,
            notes,
            cosmic_config,
            launch_mode,
        } = flags;

        let start_page = match launch_mode {
            LaunchMode::Tasks => Page::Tasks,
            LaunchMode::Notes => Page::Notes,
        };

        let mut nav_model = nav_bar::Model::default();
        for page in Page::ALL {
            let mut item = nav_model
                .insert()
                .text(page.title())
                .icon(icon::from_name(page.icon_name()).icon())
                .data(*page);
            if *page == Page::Settings {
                item = item.divider_above(true);
            }
            if *page == start_page {
                item.activate();
            }
        }

        // Editor starts on the last active tab.
        let initial_text = context
            .notes
            .active()
            .and_then(|id| notes.iter().find(|n| &n.id == id))
            .map(|n| n.content.as_str())
            .unwrap_or_default();
        let note_editor = text_editor::Content::with_text(initial_text);

        let restore_position = match (context.window_position(), core.main_window_id()) {
            (Some((x, y)), Some(id)) => {
                log::debug!("Restoring window position {},{}", x, y);
                cosmic::iced::window::move_to(id, Point::new(x, y))
            }
            _ => CosmicTask::none(),
        };

        let app = Self {
            core,
            nav_model,
            cosmic_config,
            ctx: context,
            page: start_page,
            edit_mode: false,
            form: None,
            pending_delete: None,
            note_editor,
            error: None,
        };

        (app, restore_position)
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav_model)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        if let Some(page) = self.nav_model.data::<Page>(id).cloned() {
            self.page = page;
            self.pending_delete = None;
            self.nav_model.activate(id);
        }
        CosmicTask::none()
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        let mut header_row = row().spacing(4);

        if self.page != Page::Settings {
            header_row = header_row.push(
                button::icon(icon::from_name("list-add-symbolic")).on_press(Message::NewItem),
            );
        }

        if self.page == Page::Tasks {
            let edit_btn = if self.edit_mode {
                button::suggested(fl!("header-done"))
            } else {
                button::standard(fl!("header-edit"))
            };
            header_row = header_row.push(edit_btn.on_press(Message::ToggleEditMode));
        }

        vec![header_row.into()]
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            Message::ToggleEditMode => {
                self.edit_mode = !self.edit_mode;
                self.pending_delete = None;
            }

            Message::NewItem => match self.page {
                Page::Tasks => return self.update(Message::OpenForm(FormKind::NewGroup)),
                Page::Notes => return self.update(Message::OpenForm(FormKind::NewNote)),
                Page::Settings => {}
            },

            Message::OpenForm(kind) => {
                self.form = Some(Form::new(kind, &self.ctx));
                self.core.window.show_context = true;
            }

            Message::CloseForm => {
                self.form = None;
                self.core.window.show_context = false;
            }

            Message::FormInput(field, value) => {
                if let Some(ref mut form) = self.form {
                    match field {
                        FormField::Name => form.name = value,
                        FormField::ButtonText => form.button_text = value,
                        FormField::Url => form.url = value,
                        FormField::FilePath => form.file_path = value,
                    }
                }
            }

            Message::SubmitForm => {
                if let Some(form) = self.form.take() {
                    match self.submit_form(&form) {
                        Ok(()) => {
                            self.core.window.show_context = false;
                            self.error = None;
                        }
                        Err(e) => {
                            // Keep the form open so the user can fix the name.
                            self.report(Err(e));
                            self.form = Some(form);
                        }
                    }
                }
            }

            Message::LaunchTask(ref group, ref task) => match self.ctx.launch(group, task) {
                Ok(errors) if !errors.is_empty() => {
                    let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    self.error = Some(lines.join("\n"));
                }
                Ok(_) => {}
                Err(e) => self.report(Err(e)),
            },

            Message::ConfirmDelete(target) => {
                self.pending_delete = Some(target);
            }

            Message::CancelDelete => {
                self.pending_delete = None;
            }

            Message::Delete(target) => {
                self.pending_delete = None;
                let result = match target {
                    PendingDelete::Group(ref group) => self.ctx.tasks.delete_group(group),
                    PendingDelete::Task(ref group, ref task) => {
                        self.ctx.tasks.delete_task(group, task)
                    }
                    PendingDelete::Note(ref id) => {
                        let result = self.ctx.notes.delete(id);
                        self.load_active_note();
                        result
                    }
                };
                self.report(result);
            }

            Message::SelectNote(index) => {
                let result = self.ctx.notes.set_active(index);
                self.report(result);
                self.load_active_note();
            }

            Message::NoteEditorAction(action) => {
                let is_edit = action.is_edit();
                self.note_editor.perform(action);
                if is_edit {
                    if let Some(id) = self.ctx.notes.active().cloned() {
                        let result = self.ctx.notes.write(&id, &self.note_editor.text());
                        self.report(result);
                    }
                }
            }

            Message::SaveSession => {
                let result = self.ctx.notes.save_index();
                self.report(result);
                let result = self.ctx.flush_window_position();
                self.report(result);
            }

            Message::WindowMoved(x, y) => {
                self.ctx.window_moved(x, y);
            }

            Message::WindowSettled => {
                let result = self.ctx.flush_window_position();
                self.report(result);
            }

            Message::SetCommand(kind, value) => {
                match kind {
                    CommandKind::Browser => self.ctx.config.browser_command = value,
                    CommandKind::FileOpen => self.ctx.config.file_open_command = value,
                }
                self.ctx
                    .set_opener(Box::new(CommandOpener::from_config(&self.ctx.config)));
                self.save_config();
            }

            Message::ToggleDebugLogging => {
                self.ctx.config.debug_logging = !self.ctx.config.debug_logging;
                perch::set_debug_logging(self.ctx.config.debug_logging);
                self.save_config();
            }

            Message::DismissError => {
                self.error = None;
            }
        }

        CosmicTask::none()
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        let form = self.form.as_ref()?;
        Some(
            context_drawer::context_drawer(
                container(scrollable(self.form_view(form).padding(16))).width(Length::Fill),
                Message::CloseForm,
            )
            .title(form.title()),
        )
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.form.is_some() {
            self.form = None;
            self.core.window.show_context = false;
        }
        self.pending_delete = None;
        CosmicTask::none()
    }

    fn on_close_requested(&self, _id: cosmic::iced::window::Id) -> Option<Message> {
        Some(Message::SaveSession)
    }

    fn subscription(&self) -> cosmic::iced::Subscription<Message> {
        cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                key: cosmic::iced::keyboard::Key::Character(ref c),
                modifiers,
                ..
            }) if c.as_str() == "t" && modifiers.control() => {
                Some(Message::OpenForm(FormKind::NewNote))
            }
            cosmic::iced::Event::Window(cosmic::iced::window::Event::Moved(point)) => {
                Some(Message::WindowMoved(point.x, point.y))
            }
            cosmic::iced::Event::Mouse(cosmic::iced::mouse::Event::ButtonReleased(_)) => {
                Some(Message::WindowSettled)
            }
            _ => None,
        })
    }

    fn view(&self) -> Element<'_, Message> {
        let page: Element<'_, Message> = match self.page {
            Page::Tasks => pages::tasks::tasks_view(
                self.ctx.tasks.groups(),
                self.edit_mode,
                self.pending_delete.as_ref(),
            ),
            Page::Notes => pages::notes::notes_view(
                self.ctx.notes.notes(),
                self.ctx.notes.active_index(),
                &self.note_editor,
                self.pending_delete.as_ref(),
            ),
            Page::Settings => pages::settings::settings_view(&self.ctx.config),
        };

        let mut content = column().spacing(8);
        if let Some(ref err) = self.error {
            content = content.push(error_banner(err.clone()));
        }

        container(content.push(page))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Perch {
    fn form_view<'a>(&'a self, form: &'a Form) -> column::Column<'a, Message> {
        let mut content = column().spacing(16);

        let name_label = match form.kind {
            FormKind::NewGroup | FormKind::EditGroup(_) => fl!("form-group-name"),
            FormKind::NewTask(_) | FormKind::EditTask(..) => fl!("form-task-name"),
            FormKind::NewNote => fl!("form-note-name"),
        };
        content = content.push(text::title4(name_label));
        content = content.push(
            text_input::text_input("", &form.name)
                .on_input(|v| Message::FormInput(FormField::Name, v))
                .on_submit(|_| Message::SubmitForm)
                .width(Length::Fill),
        );

        if form.has_task_fields() {
            let fields = [
                (FormField::ButtonText, fl!("form-button-text"), &form.button_text, ""),
                (FormField::Url, fl!("form-url"), &form.url, "https://example.com, https://…"),
                (FormField::FilePath, fl!("form-file-path"), &form.file_path, "/home/…"),
            ];
            for (field, label, value, placeholder) in fields {
                content = content.push(text::title4(label));
                content = content.push(
                    text_input::text_input(placeholder, value)
                        .on_input(move |v| Message::FormInput(field, v))
                        .on_submit(|_| Message::SubmitForm)
                        .width(Length::Fill),
                );
            }
        }

        content = content.push(
            button::suggested(fl!("form-save"))
                .on_press(Message::SubmitForm)
                .width(Length::Fill),
        );

        content
    }

    fn submit_form(&mut self, form: &Form) -> Result<(), StoreError> {
        let name = form.name.trim();
        match &form.kind {
            FormKind::NewGroup => self.ctx.tasks.add_group(name),
            FormKind::EditGroup(old) => self.ctx.tasks.edit_group(old, name),
            FormKind::NewTask(group) => self.ctx.tasks.add_task_with(group, name, form.patch()),
            FormKind::EditTask(group, old) => {
                self.ctx.tasks.edit_task(group, old, Some(name), form.patch())
            }
            FormKind::NewNote => {
                self.ctx.notes.create(name)?;
                let last = self.ctx.notes.notes().len().saturating_sub(1);
                self.ctx.notes.set_active(last)?;
                self.load_active_note();
                if self.page != Page::Notes {
                    self.page = Page::Notes;
                    self.activate_nav(Page::Notes);
                }
                Ok(())
            }
        }
    }

    /// Replace the editor content with the active note from disk.
    fn load_active_note(&mut self) {
        let Some(id) = self.ctx.notes.active().cloned() else {
            self.note_editor = text_editor::Content::new();
            return;
        };
        match self.ctx.notes.read(&id) {
            Ok(content) => self.note_editor = text_editor::Content::with_text(&content),
            Err(e) => {
                self.note_editor = text_editor::Content::new();
                self.report(Err(e));
            }
        }
    }

    fn activate_nav(&mut self, page: Page) {
        let id = self
            .nav_model
            .iter()
            .find(|id| self.nav_model.data::<Page>(*id) == Some(&page));
        if let Some(id) = id {
            self.nav_model.activate(id);
        }
    }

    /// Log a store failure and show it in the banner.
    fn report(&mut self, result: Result<(), StoreError>) {
        let Err(e) = result else {
            return;
        };
        let msg = match &e {
            StoreError::Conflict(name) => {
                log::warn!("{}", e);
                fl!("error-conflict", name = name.clone())
            }
            StoreError::NotFound(name) => {
                log::warn!("{}", e);
                fl!("error-not-found", name = name.clone())
            }
            StoreError::InvalidName(name) => {
                log::warn!("{}", e);
                fl!("error-invalid-name", name = name.clone())
            }
            StoreError::Io { .. } | StoreError::Json { .. } => {
                log::error!("{}", e);
                fl!("error-io", reason = e.to_string())
            }
        };
        self.error = Some(msg);
    }

    fn save_config(&self) {
        use cosmic::cosmic_config::CosmicConfigEntry;
        if let Err(e) = self.ctx.config.write_entry(&self.cosmic_config) {
            log::error!("Failed to save config: {:?}", e);
        }
    }
}

fn error_banner(message: String) -> Element<'static, Message> {
    container(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(icon::from_name("dialog-warning-symbolic").icon())
            .push(text::body(message).width(Length::Fill))
            .push(
                button::icon(icon::from_name("window-close-symbolic"))
                    .on_press(Message::DismissError),
            ),
    )
    .padding([8, 16])
    .width(Length::Fill)
    .class(theme::Container::Card)
    .into()
}
