//! Task backends for gtodo.
//!
//! - [`TasksService`] - the trait the command layer talks to
//! - [`google`] - Google Tasks implementation, OAuth flow and token cache
//! - [`ProviderError`] - error type shared by backends
//!
//! # Example
//!
//! ```ignore
//! use gtodo_tasks::google::{GoogleConfig, GoogleTasksClient, OAuthCredentials, TokenCache};
//! use gtodo_tasks::TasksService;
//!
//! let config = GoogleConfig::new(OAuthCredentials::from_file("client_secret.json")?);
//! let token = TokenCache::resolve_default()?.load()?;
//! let client = GoogleTasksClient::new(token, &config)?;
//! for list in client.list_task_lists().await? {
//!     println!("{}", list.title);
//! }
//! ```

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod service;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use service::{BoxFuture, ListTasksOptions, TasksService};
