//! Adding a task.

use std::io::Write;

use gtodo_core::{ListName, NewTask};
use gtodo_tasks::TasksService;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Inserts a task titled `title` and confirms on `out`.
pub async fn add<S, W>(
    service: &S,
    list_id: &str,
    list_name: &ListName,
    title: &str,
    out: &mut W,
) -> ClientResult<()>
where
    S: TasksService + ?Sized,
    W: Write,
{
    let task = service
        .insert_task(list_id, &NewTask::new(title))
        .await
        .map_err(|source| ClientError::TaskInsertFailed {
            list: list_name.to_string(),
            source,
        })?;

    debug!("inserted task {} into list {}", task.id, list_id);
    writeln!(
        out,
        "Task '{}' successfully added to your {} list",
        task.title, list_name
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeTasks;

    #[tokio::test]
    async fn inserts_title_and_confirms() {
        let service = FakeTasks::default();
        let mut out = Vec::new();

        add(&service, "list-1", &ListName::default(), "Buy milk", &mut out)
            .await
            .unwrap();

        assert_eq!(
            service.inserted(),
            vec![("list-1".to_string(), "Buy milk".to_string())]
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Task 'Buy milk' successfully added to your Todo list\n"
        );
    }

    #[tokio::test]
    async fn insert_failure_names_the_list() {
        let service = FakeTasks {
            fail_insert_task: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let err = add(&service, "list-1", &ListName::new("Errands"), "x", &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("could not add task to Errands list"));
        assert!(out.is_empty());
    }
}
