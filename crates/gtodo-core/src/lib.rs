//! Core types: task lists, tasks, list name, tracing setup

pub mod task;
pub mod tracing;

pub use task::{ListName, NewTask, Task, TaskList};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
