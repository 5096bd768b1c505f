//! TasksService trait definition.
//!
//! [`TasksService`] is the seam between the command layer and a remote task
//! backend. The Google implementation lives in [`crate::google`]; tests use
//! in-memory implementations.

use std::future::Future;
use std::pin::Pin;

use gtodo_core::{NewTask, Task, TaskList};

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options for listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTasksOptions {
    /// Include completed tasks.
    pub show_completed: bool,
    /// Include hidden (cleared) tasks.
    pub show_hidden: bool,
}

impl ListTasksOptions {
    /// Options selecting incomplete tasks only.
    pub fn incomplete() -> Self {
        Self {
            show_completed: false,
            show_hidden: false,
        }
    }
}

impl Default for ListTasksOptions {
    fn default() -> Self {
        Self::incomplete()
    }
}

/// Operations on the authenticated user's task lists and tasks.
///
/// Listing methods return every item across pages, in server order.
pub trait TasksService: Send + Sync {
    /// Lists all task lists.
    fn list_task_lists(&self) -> BoxFuture<'_, ProviderResult<Vec<TaskList>>>;

    /// Creates a task list with the given title and returns it.
    fn insert_task_list<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ProviderResult<TaskList>>;

    /// Lists the tasks of a task list.
    fn list_tasks<'a>(
        &'a self,
        list_id: &'a str,
        options: ListTasksOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<Task>>>;

    /// Inserts a task into a task list and returns the created task.
    fn insert_task<'a>(
        &'a self,
        list_id: &'a str,
        task: &'a NewTask,
    ) -> BoxFuture<'a, ProviderResult<Task>>;
}
