pub mod group;
pub mod note;
pub mod task;
