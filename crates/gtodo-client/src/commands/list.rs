//! Printing incomplete tasks.

use std::io::Write;

use gtodo_tasks::{ListTasksOptions, TasksService};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Writes the title of every incomplete task, one per line, in server order.
pub async fn list<S, W>(service: &S, list_id: &str, out: &mut W) -> ClientResult<()>
where
    S: TasksService + ?Sized,
    W: Write,
{
    let tasks = service
        .list_tasks(list_id, ListTasksOptions::incomplete())
        .await
        .map_err(ClientError::TasksRetrievalFailed)?;

    debug!("{} incomplete tasks in list {}", tasks.len(), list_id);
    for task in &tasks {
        writeln!(out, "{}", task.title)?;
    }
    out.flush()?;
    Ok(())
}
