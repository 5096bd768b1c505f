//! Task lists, tasks, and the name of the list gtodo manages.

use std::fmt;

/// A task list owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    /// Opaque identifier assigned by the server.
    pub id: String,
    /// Display title.
    pub title: String,
}

impl TaskList {
    /// Creates a new task list.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A single task within a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Opaque identifier assigned by the server.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Whether the task has been marked completed.
    pub completed: bool,
}

impl Task {
    /// Creates a new incomplete task.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// Builder method to set the completed flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A task to be inserted. Only the title is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// The title of the canonical task list.
///
/// Matching is exact: no case folding, no trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListName(String);

impl ListName {
    /// Name used when none is configured.
    pub const DEFAULT: &'static str = "Todo";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `list` carries exactly this title.
    pub fn matches(&self, list: &TaskList) -> bool {
        list.title == self.0
    }
}

impl Default for ListName {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
