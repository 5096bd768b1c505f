//! Google Tasks API client.
//!
//! Low-level HTTP client for the Tasks API v1: request building, bearer
//! authentication, status mapping and response parsing.

use std::future::Future;

use gtodo_core::{NewTask, Task, TaskList};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::service::{BoxFuture, ListTasksOptions, TasksService};

use super::config::GoogleConfig;
use super::tokens::Token;

/// Base URL for Google Tasks API v1.
pub const TASKS_API_BASE: &str = "https://tasks.googleapis.com/tasks/v1";

/// Largest page size the API accepts.
const MAX_PAGE_SIZE: &str = "100";

/// Task status value for completed tasks.
const STATUS_COMPLETED: &str = "completed";

/// Google Tasks API client bound to one access token.
#[derive(Debug)]
pub struct GoogleTasksClient {
    http_client: reqwest::Client,
    token: Token,
    base_url: String,
}

impl GoogleTasksClient {
    /// Creates a client that authenticates every request with `token`.
    pub fn new(token: Token, config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            token,
            base_url: TASKS_API_BASE.to_string(),
        })
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the API base URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends a request and decodes a JSON response body.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ProviderResult<T> {
        let response = request
            .header(AUTHORIZATION, self.token.authorization_header())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })
    }

    async fn task_lists_page(&self, page_token: Option<String>) -> ProviderResult<Page<ApiTaskList>> {
        let mut request = self
            .http_client
            .get(self.url("users/@me/lists"))
            .query(&[("maxResults", MAX_PAGE_SIZE)]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        self.send(request).await
    }

    async fn tasks_page(
        &self,
        list_id: &str,
        options: ListTasksOptions,
        page_token: Option<String>,
    ) -> ProviderResult<Page<ApiTask>> {
        let mut request = self
            .http_client
            .get(self.url(&format!("lists/{}/tasks", urlencoding::encode(list_id))))
            .query(&[
                ("showCompleted", options.show_completed.to_string()),
                ("showHidden", options.show_hidden.to_string()),
                ("maxResults", MAX_PAGE_SIZE.to_string()),
            ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        self.send(request).await
    }
}

impl TasksService for GoogleTasksClient {
    fn list_task_lists(&self) -> BoxFuture<'_, ProviderResult<Vec<TaskList>>> {
        Box::pin(async move {
            let lists = collect_pages(|page_token| self.task_lists_page(page_token)).await?;
            debug!("fetched {} task lists", lists.len());
            Ok(lists.into_iter().map(ApiTaskList::into_task_list).collect())
        })
    }

    fn insert_task_list<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ProviderResult<TaskList>> {
        Box::pin(async move {
            let request = self
                .http_client
                .post(self.url("users/@me/lists"))
                .json(&TitleBody { title });
            let list: ApiTaskList = self.send(request).await?;
            debug!("created task list {} ({})", list.title, list.id);
            Ok(list.into_task_list())
        })
    }

    fn list_tasks<'a>(
        &'a self,
        list_id: &'a str,
        options: ListTasksOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<Task>>> {
        Box::pin(async move {
            let tasks =
                collect_pages(|page_token| self.tasks_page(list_id, options, page_token)).await?;
            debug!("fetched {} tasks from list {}", tasks.len(), list_id);
            Ok(tasks.into_iter().map(ApiTask::into_task).collect())
        })
    }

    fn insert_task<'a>(
        &'a self,
        list_id: &'a str,
        task: &'a NewTask,
    ) -> BoxFuture<'a, ProviderResult<Task>> {
        Box::pin(async move {
            let request = self
                .http_client
                .post(self.url(&format!("lists/{}/tasks", urlencoding::encode(list_id))))
                .json(&TitleBody { title: &task.title });
            let created: ApiTask = self.send(request).await?;
            debug!("created task {} in list {}", created.id, list_id);
            Ok(created.into_task())
        })
    }
}

/// Fetches pages until the server stops returning a `nextPageToken`.
///
/// Items keep their server order across pages.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = fetch_page(page_token.take()).await?;
        items.extend(page.items);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

/// One page of a list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

/// Request body carrying only a title.
#[derive(Debug, Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

/// A task list from the API.
#[derive(Debug, Deserialize)]
struct ApiTaskList {
    id: String,
    #[serde(default)]
    title: String,
}

impl ApiTaskList {
    fn into_task_list(self) -> TaskList {
        TaskList::new(self.id, self.title)
    }
}

/// A task from the API.
#[derive(Debug, Deserialize)]
struct ApiTask {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: Option<String>,
}

impl ApiTask {
    fn into_task(self) -> Task {
        let completed = self.status.as_deref() == Some(STATUS_COMPLETED);
        Task::new(self.id, self.title).with_completed(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::config::OAuthCredentials;

    fn config() -> GoogleConfig {
        GoogleConfig::new(OAuthCredentials::new(
            "test.apps.googleusercontent.com",
            "secret",
        ))
    }

    fn page<T>(items: Vec<T>, next: Option<&str>) -> Page<T> {
        Page {
            items,
            next_page_token: next.map(str::to_string),
        }
    }

    #[test]
    fn parse_task_lists_page() {
        let json = r#"{
            "kind": "tasks#taskLists",
            "etag": "\"abc\"",
            "nextPageToken": "page-2",
            "items": [
                {
                    "kind": "tasks#taskList",
                    "id": "MTIzNDU2",
                    "title": "My Tasks",
                    "updated": "2024-03-15T10:00:00.000Z"
                },
                {
                    "kind": "tasks#taskList",
                    "id": "Nzg5",
                    "title": "Todo"
                }
            ]
        }"#;

        let page: Page<ApiTaskList> = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
        let lists: Vec<TaskList> = page.items.into_iter().map(ApiTaskList::into_task_list).collect();
        assert_eq!(lists, vec![TaskList::new("MTIzNDU2", "My Tasks"), TaskList::new("Nzg5", "Todo")]);
    }

    #[test]
    fn parse_empty_page_without_items() {
        let page: Page<ApiTask> = serde_json::from_str(r#"{"kind": "tasks#tasks"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn parse_tasks_with_status() {
        let json = r#"{
            "items": [
                {"id": "t1", "title": "Buy milk", "status": "needsAction"},
                {"id": "t2", "title": "Call mom", "status": "completed", "completed": "2024-03-15T10:00:00.000Z"},
                {"id": "t3"}
            ]
        }"#;

        let page: Page<ApiTask> = serde_json::from_str(json).unwrap();
        let tasks: Vec<Task> = page.items.into_iter().map(ApiTask::into_task).collect();
        assert_eq!(tasks[0], Task::new("t1", "Buy milk"));
        assert!(tasks[1].completed);
        assert_eq!(tasks[2].title, "");
        assert!(!tasks[2].completed);
    }

    #[test]
    fn title_body_serializes_only_title() {
        let body = serde_json::to_string(&TitleBody { title: "Buy milk" }).unwrap();
        assert_eq!(body, r#"{"title":"Buy milk"}"#);
    }

    #[tokio::test]
    async fn collect_pages_follows_tokens_in_order() {
        let mut pages = vec![
            page(vec![3, 4], None),
            page(vec![2], Some("p3")),
            page(vec![0, 1], Some("p2")),
        ];
        let mut seen_tokens = Vec::new();

        let items = collect_pages(|token| {
            seen_tokens.push(token);
            let next = pages.pop().unwrap();
            async move { Ok(next) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert_eq!(
            seen_tokens,
            vec![None, Some("p2".to_string()), Some("p3".to_string())]
        );
    }

    #[tokio::test]
    async fn collect_pages_stops_on_empty_token() {
        let mut calls = 0;
        let items = collect_pages(|_| {
            calls += 1;
            async { Ok(page(vec!["a"], Some(""))) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a"]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn collect_pages_propagates_errors() {
        let result: ProviderResult<Vec<u8>> =
            collect_pages(|_| async { Err(ProviderError::network("boom")) }).await;
        assert!(result.is_err());
    }

    #[test]
    fn client_urls() {
        let client = GoogleTasksClient::new(Token::new("abc"), &config()).unwrap();
        assert_eq!(client.base_url(), TASKS_API_BASE);
        assert_eq!(
            client.url("users/@me/lists"),
            "https://tasks.googleapis.com/tasks/v1/users/@me/lists"
        );

        let client = client.with_base_url("http://127.0.0.1:9/tasks/v1/");
        assert_eq!(client.url("lists/x/tasks"), "http://127.0.0.1:9/tasks/v1/lists/x/tasks");
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let client = GoogleTasksClient::new(Token::new("abc"), &config())
            .unwrap()
            .with_base_url("http://127.0.0.1:9/tasks/v1");
        let err = client.list_task_lists().await.unwrap_err();
        assert_eq!(err.code(), crate::ProviderErrorCode::NetworkError);
    }
}
