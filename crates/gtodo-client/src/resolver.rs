//! Finding the managed task list, creating it on first use.

use gtodo_core::ListName;
use gtodo_tasks::TasksService;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Returns the id of the first task list titled exactly `name`.
///
/// When no such list exists a single one is created. A failure to list is
/// fatal and never leads to a create.
pub async fn get_todo_list_id<S>(service: &S, name: &ListName) -> ClientResult<String>
where
    S: TasksService + ?Sized,
{
    let lists = service
        .list_task_lists()
        .await
        .map_err(ClientError::TaskListRetrievalFailed)?;

    if let Some(list) = lists.into_iter().find(|list| name.matches(list)) {
        debug!("found task list {:?} with id {}", name.as_str(), list.id);
        return Ok(list.id);
    }

    info!("task list {:?} not found, creating it", name.as_str());
    let list = service
        .insert_task_list(name.as_str())
        .await
        .map_err(|source| ClientError::NoTodoList {
            list: name.to_string(),
            source,
        })?;
    Ok(list.id)
}
