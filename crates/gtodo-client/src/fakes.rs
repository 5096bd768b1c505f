//! In-memory service doubles for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use gtodo_core::{NewTask, Task, TaskList};
use gtodo_tasks::google::{AuthorizationRequest, OAuthFlow, PkceFlow, Token};
use gtodo_tasks::{BoxFuture, ListTasksOptions, ProviderError, ProviderResult, TasksService};

/// A task service backed by vectors, recording every call.
#[derive(Debug, Default)]
pub struct FakeTasks {
    pub lists: Mutex<Vec<TaskList>>,
    pub tasks: Vec<Task>,
    pub fail_list_lists: bool,
    pub fail_insert_list: bool,
    pub fail_list_tasks: bool,
    pub fail_insert_task: bool,
    pub created_lists: Mutex<Vec<String>>,
    pub task_queries: Mutex<Vec<(String, ListTasksOptions)>>,
    pub inserted: Mutex<Vec<(String, String)>>,
}

impl FakeTasks {
    pub fn with_lists(lists: Vec<TaskList>) -> Self {
        Self {
            lists: Mutex::new(lists),
            ..Default::default()
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn created_lists(&self) -> Vec<String> {
        self.created_lists.lock().unwrap().clone()
    }

    pub fn task_queries(&self) -> Vec<(String, ListTasksOptions)> {
        self.task_queries.lock().unwrap().clone()
    }

    pub fn inserted(&self) -> Vec<(String, String)> {
        self.inserted.lock().unwrap().clone()
    }
}

impl TasksService for FakeTasks {
    fn list_task_lists(&self) -> BoxFuture<'_, ProviderResult<Vec<TaskList>>> {
        Box::pin(async move {
            if self.fail_list_lists {
                return Err(ProviderError::network("connection reset"));
            }
            Ok(self.lists.lock().unwrap().clone())
        })
    }

    fn insert_task_list<'a>(&'a self, title: &'a str) -> BoxFuture<'a, ProviderResult<TaskList>> {
        Box::pin(async move {
            self.created_lists.lock().unwrap().push(title.to_string());
            if self.fail_insert_list {
                return Err(ProviderError::from_status(403, "forbidden"));
            }
            let mut lists = self.lists.lock().unwrap();
            let list = TaskList::new(format!("created-{}", lists.len()), title);
            lists.push(list.clone());
            Ok(list)
        })
    }

    fn list_tasks<'a>(
        &'a self,
        list_id: &'a str,
        options: ListTasksOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<Task>>> {
        Box::pin(async move {
            self.task_queries
                .lock()
                .unwrap()
                .push((list_id.to_string(), options));
            if self.fail_list_tasks {
                return Err(ProviderError::from_status(500, "backend error"));
            }
            Ok(self
                .tasks
                .iter()
                .filter(|task| options.show_completed || !task.completed)
                .cloned()
                .collect())
        })
    }

    fn insert_task<'a>(
        &'a self,
        list_id: &'a str,
        task: &'a NewTask,
    ) -> BoxFuture<'a, ProviderResult<Task>> {
        Box::pin(async move {
            self.inserted
                .lock()
                .unwrap()
                .push((list_id.to_string(), task.title.clone()));
            if self.fail_insert_task {
                return Err(ProviderError::from_status(400, "invalid title"));
            }
            Ok(Task::new("new-task", task.title.clone()))
        })
    }
}

/// An OAuth flow that hands out canned tokens and counts its calls.
#[derive(Debug, Default)]
pub struct FakeOAuth {
    pub fail_exchange: bool,
    pub fail_refresh: bool,
    pub exchanges: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub codes: Mutex<Vec<String>>,
}

impl FakeOAuth {
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn codes(&self) -> Vec<String> {
        self.codes.lock().unwrap().clone()
    }
}

impl OAuthFlow for FakeOAuth {
    fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest::new("https://accounts.example.com/auth?state=test", PkceFlow::new())
    }

    fn exchange<'a>(
        &'a self,
        code: &'a str,
        _request: &'a AuthorizationRequest,
    ) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(async move {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            self.codes.lock().unwrap().push(code.to_string());
            if self.fail_exchange {
                return Err(ProviderError::authentication("invalid_grant"));
            }
            Ok(Token::new(format!("access-for-{}", code)).with_refresh_token("refresh"))
        })
    }

    fn refresh<'a>(&'a self, token: &'a Token) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(async move {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.fail_refresh {
                return Err(ProviderError::authentication("token revoked"));
            }
            let mut refreshed = token.clone();
            refreshed.access_token = "refreshed".to_string();
            refreshed.expiry = None;
            Ok(refreshed)
        })
    }
}
