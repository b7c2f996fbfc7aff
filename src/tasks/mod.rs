//! AI task matrix: task records, due-date display and the persisted list.

pub mod due_date;
pub mod entry;
pub mod matrix;

pub use due_date::{describe_due, DueLabel};
pub use entry::{
    Communication, CommunicationKind, ExtractedTask, Priority, Task, TaskDraft, DEFAULT_TASK_TYPE,
};
pub use matrix::{display_order, TaskFilter, TaskMatrix, TASK_BUNDLE};
