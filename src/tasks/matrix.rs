//! The task matrix: the persisted task list and its operations.

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::due_date::parse_due;
use super::entry::{Communication, CommunicationKind, ExtractedTask, Task, TaskDraft};
use crate::error::{DashboardError, Result};
use crate::store::{self, keys, BundleKind, StateStore};

pub const TASK_BUNDLE: BundleKind = BundleKind {
    label: "tasks",
    legacy_key: "tasks",
    required_fields: &["id", "text"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        })
    }
}

/// Display order: incomplete first, then earliest due date (missing or
/// invalid dates last), then newest first
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    fn due_key(task: &Task) -> Option<NaiveDate> {
        task.due_date.as_deref().and_then(parse_due)
    }

    a.completed
        .cmp(&b.completed)
        .then_with(|| match (due_key(a), due_key(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct TaskMatrix {
    store: StateStore,
    tasks: Vec<Task>,
}

impl TaskMatrix {
    pub fn load(store: StateStore) -> Self {
        let tasks: Vec<Task> = store.load_or_default(keys::TASKS);
        tracing::debug!(count = tasks.len(), "Loaded tasks");
        Self { store, tasks }
    }

    /// Tasks in stored order (newest additions first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("task {}", id)))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("task {}", id)))
    }

    /// Save `next` and adopt it. On a failed save the current list is kept.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        self.store.save(keys::TASKS, &next)?;
        self.tasks = next;
        Ok(())
    }

    /// Apply `change` to a copy of one task and commit it
    fn edit(&mut self, id: &str, change: impl FnOnce(&mut Task)) -> Result<Task> {
        let index = self.position(id)?;
        let mut next = self.tasks.clone();
        change(&mut next[index]);
        let updated = next[index].clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn prepend(&mut self, task: Task) -> Result<Task> {
        let mut next = Vec::with_capacity(self.tasks.len() + 1);
        next.push(task.clone());
        next.extend(self.tasks.iter().cloned());
        self.commit(next)?;
        Ok(task)
    }

    /// Filtered tasks in display order
    pub fn view(&self, filter: TaskFilter) -> Vec<&Task> {
        let mut visible: Vec<&Task> = self.tasks.iter().filter(|t| filter.matches(t)).collect();
        visible.sort_by(|a, b| display_order(a, b));
        visible
    }

    /// Add a task from the manual form. The title is required.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        if draft.text.trim().is_empty() {
            return Err(DashboardError::MissingField("Task title".to_string()));
        }
        let task = self.prepend(Task::from_draft(new_id(), draft, now_millis()))?;
        tracing::info!(id = %task.id, "Added task");
        Ok(task)
    }

    /// Replace a task's editable fields
    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Task> {
        if draft.text.trim().is_empty() {
            return Err(DashboardError::MissingField("Task title".to_string()));
        }
        self.edit(id, |task| task.apply_draft(draft))
    }

    /// Merge a model-extracted task into the list (prepended)
    pub fn merge_extracted(&mut self, extracted: ExtractedTask) -> Result<Task> {
        let draft = extracted.into_draft();
        if draft.text.trim().is_empty() {
            return Err(DashboardError::MalformedResponse);
        }
        let task = self.prepend(Task::from_draft(new_id(), draft, now_millis()))?;
        tracing::info!(id = %task.id, "Added extracted task");
        Ok(task)
    }

    /// Flip completion. Returns the new state.
    pub fn toggle_completed(&mut self, id: &str) -> Result<bool> {
        let task = self.edit(id, |task| task.completed = !task.completed)?;
        Ok(task.completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let index = self.position(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Append to a task's communication log
    pub fn log_communication(
        &mut self,
        id: &str,
        kind: CommunicationKind,
        text: &str,
    ) -> Result<Communication> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DashboardError::MissingField("Communication note".to_string()));
        }

        let entry = Communication {
            id: new_id(),
            kind,
            text: text.to_string(),
            timestamp: now_millis(),
        };
        let logged = entry.clone();
        self.edit(id, move |task| task.communications.push(logged))?;
        Ok(entry)
    }

    /// Record assistant output as a note and in the internal notes
    pub fn add_assistant_notes(
        &mut self,
        id: &str,
        action: &str,
        custom_prompt: Option<&str>,
        content: &str,
        at: DateTime<Local>,
    ) -> Result<Task> {
        let prompt_line = custom_prompt
            .map(|p| format!("Prompt: {}\n", p))
            .unwrap_or_default();

        let entry = Communication {
            id: new_id(),
            kind: CommunicationKind::Note,
            text: format!(
                "--- AI Assistant Generated ---\nAction: {}\n{}Response:\n{}",
                action, prompt_line, content
            ),
            timestamp: at.timestamp_millis(),
        };

        self.edit(id, |task| {
            task.communications.push(entry);
            task.internal_notes = format!(
                "{}\n\n--- AI Assistant ({}) ---\n{}",
                task.internal_notes,
                at.format("%-m/%-d/%Y, %-I:%M:%S %p"),
                content
            )
            .trim()
            .to_string();
        })
    }

    /// Export bundle file name for `date`
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("matrix-tasks-export-{}.json", date.format("%Y-%m-%d"))
    }

    pub fn export(&self, now: DateTime<Utc>) -> Result<String> {
        store::export_bundle(&TASK_BUNDLE, &self.tasks, now)
    }

    /// Replace the whole list with an imported bundle
    pub fn import(&mut self, raw: &str) -> Result<usize> {
        let tasks: Vec<Task> = store::import_bundle(&TASK_BUNDLE, raw)?;
        self.commit(tasks)?;
        Ok(self.tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::entry::Priority;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn matrix() -> (TempDir, TaskMatrix) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        (dir, TaskMatrix::load(store))
    }

    fn draft(title: &str, due: Option<&str>) -> TaskDraft {
        TaskDraft {
            text: title.into(),
            due_date: due.map(String::from),
            ..TaskDraft::default()
        }
    }

    fn task(id: &str, completed: bool, due: Option<&str>, created_at: i64) -> Task {
        let mut task = Task::from_draft(id.into(), draft(id, due), created_at);
        task.completed = completed;
        task
    }

    #[test]
    fn test_add_requires_title_and_prepends() {
        let (_dir, mut matrix) = matrix();
        assert!(matches!(
            matrix.add(draft("  ", None)),
            Err(DashboardError::MissingField(_))
        ));

        matrix.add(draft("first", None)).unwrap();
        let second = matrix.add(draft("second", None)).unwrap();
        assert_eq!(matrix.tasks()[0].id, second.id);
        assert!(!second.completed);
        assert!(second.communications.is_empty());
    }

    #[test]
    fn test_changes_persist() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let mut matrix = TaskMatrix::load(store.clone());

        let task = matrix.add(draft("Call Ann", Some("2024-01-02"))).unwrap();
        matrix.toggle_completed(&task.id).unwrap();
        matrix
            .log_communication(&task.id, CommunicationKind::Call, "Left voicemail")
            .unwrap();

        let reloaded = TaskMatrix::load(store);
        let saved = reloaded.get(&task.id).unwrap();
        assert!(saved.completed);
        assert_eq!(saved.communications.len(), 1);
        assert_eq!(saved.communications[0].kind, CommunicationKind::Call);
    }

    #[test]
    fn test_failed_save_keeps_list_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let mut matrix = TaskMatrix::load(store.clone());
        let kept = matrix.add(draft("Call Ann", None)).unwrap();

        crate::store::state_store::block_key(&store, keys::TASKS);

        assert!(matrix.add(draft("Call Bob", None)).is_err());
        assert!(matrix.toggle_completed(&kept.id).is_err());
        assert!(matrix
            .log_communication(&kept.id, CommunicationKind::Note, "hi")
            .is_err());
        assert!(matrix.delete(&kept.id).is_err());

        assert_eq!(matrix.tasks(), &[kept]);
    }

    #[test]
    fn test_communication_requires_text_and_keeps_order() {
        let (_dir, mut matrix) = matrix();
        let task = matrix.add(draft("t", None)).unwrap();

        assert!(matrix
            .log_communication(&task.id, CommunicationKind::Note, "   ")
            .is_err());
        matrix
            .log_communication(&task.id, CommunicationKind::Email, "one")
            .unwrap();
        matrix
            .log_communication(&task.id, CommunicationKind::Note, "two")
            .unwrap();

        let log = &matrix.get(&task.id).unwrap().communications;
        assert_eq!(log[0].text, "one");
        assert_eq!(log[1].text, "two");
    }

    #[test]
    fn test_display_order() {
        let mut tasks = vec![
            task("done", true, Some("2024-01-01"), 5),
            task("invalid", false, Some("someday"), 9),
            task("late", false, Some("2024-05-01"), 1),
            task("early", false, Some("2024-02-01"), 1),
            task("none-old", false, None, 1),
            task("none-new", false, None, 2),
        ];
        tasks.sort_by(display_order);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "invalid", "none-new", "none-old", "done"]);
    }

    #[test]
    fn test_filter() {
        let (_dir, mut matrix) = matrix();
        let a = matrix.add(draft("a", None)).unwrap();
        matrix.add(draft("b", None)).unwrap();
        matrix.toggle_completed(&a.id).unwrap();

        assert_eq!(matrix.view(TaskFilter::All).len(), 2);
        assert_eq!(matrix.view(TaskFilter::Active).len(), 1);
        assert_eq!(matrix.view(TaskFilter::Completed)[0].id, a.id);
        assert_eq!("completed".parse::<TaskFilter>().unwrap(), TaskFilter::Completed);
    }

    #[test]
    fn test_merge_extracted_keeps_invalid_due_date() {
        let (_dir, mut matrix) = matrix();
        let extracted = ExtractedTask {
            text: Some("Renew auto".into()),
            due_date: Some("end of month".into()),
            priority: Some("low".into()),
            ..ExtractedTask::default()
        };
        let task = matrix.merge_extracted(extracted).unwrap();
        assert_eq!(task.due_date.as_deref(), Some("end of month"));
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.task_type, "Follow-up");
        assert_eq!(matrix.tasks()[0].id, task.id);
    }

    #[test]
    fn test_assistant_notes_format() {
        let (_dir, mut matrix) = matrix();
        let task = matrix.add(draft("t", None)).unwrap();
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();

        let updated = matrix
            .add_assistant_notes(&task.id, "custom", Some("Summarize"), "All good", at)
            .unwrap();

        let note = updated.communications.last().unwrap();
        assert_eq!(note.kind, CommunicationKind::Note);
        assert_eq!(
            note.text,
            "--- AI Assistant Generated ---\nAction: custom\nPrompt: Summarize\nResponse:\nAll good"
        );
        assert_eq!(
            updated.internal_notes,
            "--- AI Assistant (3/5/2024, 2:07:09 PM) ---\nAll good"
        );
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_dir, mut matrix) = matrix();
        let first = matrix.add(draft("first", Some("2024-01-01"))).unwrap();
        matrix.add(draft("second", None)).unwrap();
        matrix
            .log_communication(&first.id, CommunicationKind::Note, "hello")
            .unwrap();
        let before = matrix.tasks().to_vec();

        let raw = matrix.export(Utc::now()).unwrap();

        let (_dir2, mut other) = self::matrix();
        assert_eq!(other.import(&raw).unwrap(), 2);
        assert_eq!(other.tasks(), before.as_slice());
    }

    #[test]
    fn test_export_empty_rejected() {
        let (_dir, matrix) = matrix();
        assert!(matches!(
            matrix.export(Utc::now()),
            Err(DashboardError::NothingToExport(_))
        ));
        assert_eq!(
            TaskMatrix::export_file_name(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            "matrix-tasks-export-2024-06-01.json"
        );
    }
}
