//! SQLite-backed task store.
//!
//! The persistence collaborator for the NLU core: it consumes the values
//! the parser produced and never interprets them. All timestamps cross this
//! boundary as ISO-8601 text with second precision. Query methods that
//! filter by time take the reference moment as a parameter so they stay
//! deterministic under test.

use std::path::Path;
use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::nlu::Priority;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp as ISO-8601 with second precision.
pub fn to_iso(dt: &NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_FORMAT).ok()
}

/// Lifecycle status of a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

/// Counts for the dashboard and the view-tasks reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_today: usize,
}

/// SQLite task store. The connection sits behind a mutex so that each
/// create/update/delete is serialized per the store's atomicity contract.
pub struct TaskStore {
    conn: Mutex<Connection>,
}

impl TaskStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                description TEXT DEFAULT '',
                due_date    TEXT,
                priority    TEXT DEFAULT 'medium',
                status      TEXT DEFAULT 'pending',
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("task store mutex poisoned")
    }

    /// Insert a task and return its id.
    pub fn create(&self, task: &NewTask) -> Result<i64, Error> {
        let now = to_iso(&Local::now().naive_local());
        let conn = self.lock();
        conn.execute(
            "INSERT INTO tasks (title, description, due_date, priority, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?5)",
            rusqlite::params![
                task.title,
                task.description,
                task.due_date.as_ref().map(to_iso),
                task.priority.as_str(),
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a task by id.
    pub fn get(&self, id: i64) -> Result<Option<TaskRecord>, Error> {
        let conn = self.lock();
        let record = conn
            .query_row("SELECT * FROM tasks WHERE id = ?1", [id], row_to_record)
            .optional()?;
        Ok(record)
    }

    /// Apply a partial update. Returns false when the id does not exist.
    /// Always bumps `updated_at`.
    pub fn update(&self, id: i64, update: &TaskUpdate) -> Result<bool, Error> {
        use rusqlite::types::Value;

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(title) = &update.title {
            sets.push("title = ?");
            values.push(Value::Text(title.clone()));
        }
        if let Some(description) = &update.description {
            sets.push("description = ?");
            values.push(Value::Text(description.clone()));
        }
        if let Some(due_date) = &update.due_date {
            sets.push("due_date = ?");
            values.push(Value::Text(to_iso(due_date)));
        }
        if let Some(priority) = &update.priority {
            sets.push("priority = ?");
            values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(status) = &update.status {
            sets.push("status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }

        sets.push("updated_at = ?");
        values.push(Value::Text(to_iso(&Local::now().naive_local())));
        values.push(Value::Integer(id));

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));

        let conn = self.lock();
        let changed = conn.execute(&sql, params_from_iter(values))?;
        Ok(changed > 0)
    }

    /// Delete a task. Returns false when the id does not exist.
    pub fn delete(&self, id: i64) -> Result<bool, Error> {
        let conn = self.lock();
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// List tasks, optionally filtered by status and/or priority, newest
    /// first.
    pub fn list(
        &self,
        status: Option<TaskStatus>,
        priority: Option<Priority>,
    ) -> Result<Vec<TaskRecord>, Error> {
        let mut sql = "SELECT * FROM tasks".to_string();
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(status) = status {
            conditions.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(priority) = priority {
            conditions.push("priority = ?");
            values.push(priority.as_str().to_string());
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Pending tasks whose due date falls on `today`, soonest first.
    pub fn due_today(&self, today: NaiveDate) -> Result<Vec<TaskRecord>, Error> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM tasks
             WHERE date(due_date) = ?1 AND status = 'pending'
             ORDER BY due_date ASC",
        )?;
        let rows = stmt.query_map([today.format("%Y-%m-%d").to_string()], row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Pending tasks whose due date has passed relative to `now`.
    pub fn overdue(&self, now: NaiveDateTime) -> Result<Vec<TaskRecord>, Error> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM tasks
             WHERE due_date < ?1 AND status = 'pending'
             ORDER BY due_date ASC",
        )?;
        let rows = stmt.query_map([to_iso(&now)], row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Aggregate counts for the dashboard / view reply.
    pub fn summary(&self, now: NaiveDateTime) -> Result<TaskSummary, Error> {
        let total = self.list(None, None)?.len();
        let pending = self.list(Some(TaskStatus::Pending), None)?.len();
        let completed = self.list(Some(TaskStatus::Completed), None)?.len();
        let overdue = self.overdue(now)?.len();
        let due_today = self.due_today(now.date())?.len();

        Ok(TaskSummary {
            total,
            pending,
            completed,
            overdue,
            due_today,
        })
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    let due_date: Option<String> = row.get("due_date")?;
    let priority: String = row.get("priority")?;
    let status: String = row.get("status")?;

    Ok(TaskRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        due_date: due_date.as_deref().and_then(parse_iso),
        priority: Priority::from_str_lossy(&priority),
        status: TaskStatus::from_str_lossy(&status),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TaskStore {
        TaskStore::open_in_memory().unwrap()
    }

    fn new_task(title: &str, due: Option<NaiveDateTime>) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            due_date: due,
            priority: Priority::Medium,
        }
    }

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_iso_format_has_second_precision() {
        assert_eq!(to_iso(&ts(2024, 1, 1, 15)), "2024-01-01T15:00:00");
        assert_eq!(parse_iso("2024-01-01T15:00:00"), Some(ts(2024, 1, 1, 15)));
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        let id = store
            .create(&NewTask {
                title: "Call mom".into(),
                description: "about the trip".into(),
                due_date: Some(ts(2024, 1, 1, 15)),
                priority: Priority::High,
            })
            .unwrap();

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.title, "Call mom");
        assert_eq!(record.description, "about the trip");
        assert_eq!(record.due_date, Some(ts(2024, 1, 1, 15)));
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.status, TaskStatus::Pending);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = store();
        assert!(store.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_status() {
        let store = store();
        let id = store.create(&new_task("x", None)).unwrap();

        assert!(store
            .update(id, &TaskUpdate::status(TaskStatus::Completed))
            .unwrap());
        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.status, TaskStatus::Completed);

        assert!(!store
            .update(999, &TaskUpdate::status(TaskStatus::Completed))
            .unwrap());
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let store = store();
        let id = store
            .create(&NewTask {
                title: "orig".into(),
                description: "desc".into(),
                due_date: None,
                priority: Priority::Low,
            })
            .unwrap();

        store
            .update(
                id,
                &TaskUpdate {
                    title: Some("renamed".into()),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.title, "renamed");
        assert_eq!(record.description, "desc");
        assert_eq!(record.priority, Priority::Low);
    }

    #[test]
    fn test_delete() {
        let store = store();
        let id = store.create(&new_task("x", None)).unwrap();
        assert!(store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert!(!store.delete(id).unwrap());
    }

    #[test]
    fn test_list_filters() {
        let store = store();
        let a = store.create(&new_task("a", None)).unwrap();
        let _b = store.create(&new_task("b", None)).unwrap();
        store
            .update(a, &TaskUpdate::status(TaskStatus::Completed))
            .unwrap();

        assert_eq!(store.list(None, None).unwrap().len(), 2);
        assert_eq!(store.list(Some(TaskStatus::Pending), None).unwrap().len(), 1);
        assert_eq!(
            store.list(Some(TaskStatus::Completed), None).unwrap().len(),
            1
        );
        assert_eq!(store.list(None, Some(Priority::High)).unwrap().len(), 0);
    }

    #[test]
    fn test_overdue_and_due_today() {
        let store = store();
        let now = ts(2024, 6, 15, 12);

        store
            .create(&new_task("past", Some(ts(2024, 6, 14, 9))))
            .unwrap();
        store
            .create(&new_task("today", Some(ts(2024, 6, 15, 18))))
            .unwrap();
        store
            .create(&new_task("future", Some(ts(2024, 6, 20, 9))))
            .unwrap();
        store.create(&new_task("no due", None)).unwrap();

        let overdue = store.overdue(now).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].title, "past");

        let today = store.due_today(now.date()).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].title, "today");
    }

    #[test]
    fn test_completed_tasks_never_overdue() {
        let store = store();
        let now = ts(2024, 6, 15, 12);
        let id = store
            .create(&new_task("past", Some(ts(2024, 6, 14, 9))))
            .unwrap();
        store
            .update(id, &TaskUpdate::status(TaskStatus::Completed))
            .unwrap();
        assert!(store.overdue(now).unwrap().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let store = store();
        let now = ts(2024, 6, 15, 12);

        let done = store.create(&new_task("done", None)).unwrap();
        store
            .update(done, &TaskUpdate::status(TaskStatus::Completed))
            .unwrap();
        store
            .create(&new_task("late", Some(ts(2024, 6, 1, 9))))
            .unwrap();
        store
            .create(&new_task("today", Some(ts(2024, 6, 15, 17))))
            .unwrap();

        let summary = store.summary(now).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.due_today, 1);
    }

    #[test]
    fn test_on_disk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        let id;
        {
            let store = TaskStore::open(&path).unwrap();
            id = store.create(&new_task("persisted", None)).unwrap();
        }
        let store = TaskStore::open(&path).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().title, "persisted");
    }
}
