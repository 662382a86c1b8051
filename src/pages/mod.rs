pub mod notes;
pub mod settings;
pub mod tasks;
