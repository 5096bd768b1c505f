//! The two things `todo` does with the resolved list.

pub mod add;
pub mod list;

use std::io::Write;

use gtodo_core::ListName;
use gtodo_tasks::TasksService;

use crate::error::ClientResult;
use crate::resolver::get_todo_list_id;

/// Resolves the list, then lists its tasks when `title` is `None` or adds
/// the task otherwise.
pub async fn execute<S, W>(
    service: &S,
    list_name: &ListName,
    title: Option<&str>,
    out: &mut W,
) -> ClientResult<()>
where
    S: TasksService + ?Sized,
    W: Write,
{
    let list_id = get_todo_list_id(service, list_name).await?;
    match title {
        None => list::list(service, &list_id, out).await,
        Some(title) => add::add(service, &list_id, list_name, title, out).await,
    }
}
