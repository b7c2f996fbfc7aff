//! Task matrix commands.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use serde::Serialize;

use super::{notify, DashboardState, Notice};
use crate::error::DashboardError;
use crate::tasks::{describe_due, CommunicationKind, Task, TaskDraft, TaskFilter, TaskMatrix};

/// A task as listed, with its due-date label resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub due_label: String,
    pub overdue: bool,
}

fn matrix(state: &DashboardState) -> TaskMatrix {
    TaskMatrix::load(state.store.clone())
}

pub fn list_tasks(state: &DashboardState, filter: TaskFilter) -> Vec<TaskRow> {
    let today = Local::now().date_naive();
    matrix(state)
        .view(filter)
        .into_iter()
        .map(|task| {
            let label = describe_due(task.due_date.as_deref(), today);
            TaskRow {
                task: task.clone(),
                due_label: label.text,
                overdue: label.overdue,
            }
        })
        .collect()
}

pub fn add_task(state: &DashboardState, draft: TaskDraft) -> Notice {
    notify(matrix(state).add(draft), |_| Notice::success("Task added!"))
}

pub fn update_task(state: &DashboardState, id: &str, draft: TaskDraft) -> Notice {
    notify(matrix(state).update(id, draft), |_| Notice::success("Task updated!"))
}

/// Edit form pre-filled from the stored task
pub fn edit_form(state: &DashboardState, id: &str) -> Result<TaskDraft, String> {
    Ok(matrix(state).get(id)?.to_draft())
}

pub fn toggle_task(state: &DashboardState, id: &str) -> Notice {
    notify(matrix(state).toggle_completed(id), |completed| {
        if completed {
            Notice::success("Task completed.")
        } else {
            Notice::info("Task reopened.")
        }
    })
}

pub fn delete_task(state: &DashboardState, id: &str) -> Notice {
    notify(matrix(state).delete(id), |_| Notice::info("Task removed."))
}

pub fn log_communication(
    state: &DashboardState,
    id: &str,
    kind: CommunicationKind,
    text: &str,
) -> Notice {
    notify(matrix(state).log_communication(id, kind, text), |entry| {
        Notice::success(format!("'{}' logged successfully.", entry.kind))
    })
}

/// Write the task bundle into the output directory
pub fn export_tasks(state: &DashboardState) -> Result<PathBuf, String> {
    let raw = matrix(state).export(Utc::now())?;
    let file_name = TaskMatrix::export_file_name(Local::now().date_naive());
    Ok(state.export.save_file(&file_name, &raw)?)
}

/// Replace the task list with a bundle read from `path`
pub fn import_tasks(state: &DashboardState, path: &Path) -> Notice {
    let result = std::fs::read_to_string(path)
        .map_err(DashboardError::from)
        .and_then(|raw| matrix(state).import(&raw));
    notify(result, |_| Notice::success("Tasks imported successfully!"))
}
