use cosmic::widget::text_editor;

use perch::core::note::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Tasks,
    Notes,
    Settings,
}

impl Page {
    pub fn title(&self) -> String {
        match self {
            Self::Tasks => crate::fl!("page-tasks"),
            Self::Notes => crate::fl!("page-notes"),
            Self::Settings => crate::fl!("page-settings"),
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Tasks => "view-list-symbolic",
            Self::Notes => "accessories-text-editor-symbolic",
            Self::Settings => "emblem-system-symbolic",
        }
    }

    pub const ALL: &'static [Page] = &[Page::Tasks, Page::Notes, Page::Settings];
}

/// What the context drawer is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewGroup,
    EditGroup(String),
    NewTask(String),
    EditTask(String, String),
    NewNote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    ButtonText,
    Url,
    FilePath,
}

/// Item awaiting an inline "Delete?" confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Group(String),
    Task(String, String),
    Note(NoteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Browser,
    FileOpen,
}

#[derive(Debug, Clone)]
pub enum Message {
    ToggleEditMode,
    NewItem,

    // Context drawer form
    OpenForm(FormKind),
    CloseForm,
    FormInput(FormField, String),
    SubmitForm,

    // Tasks
    LaunchTask(String, String),

    // Deletes
    ConfirmDelete(PendingDelete),
    CancelDelete,
    Delete(PendingDelete),

    // Notes
    SelectNote(usize),
    NoteEditorAction(text_editor::Action),
    SaveSession,

    // Window
    WindowMoved(f32, f32),
    WindowSettled,

    // Settings
    SetCommand(CommandKind, String),
    ToggleDebugLogging,

    DismissError,
}
