//! Client error types.
//!
//! Every unrecoverable failure of a run ends up as a [`ClientError`] and is
//! reported once by `main`. A cache miss is not an error at this level: the
//! authenticator recovers from it by running the interactive flow.

use std::io;

use gtodo_tasks::ProviderError;
use gtodo_tasks::google::CacheError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration or client secret could not be read or is invalid.
    #[error("unable to read configuration: {0}")]
    ConfigUnreadable(String),

    /// The token cache location could not be resolved or created.
    #[error("unable to get path to cached credential file: {0}")]
    CacheDirUnavailable(#[source] CacheError),

    /// The token could not be written to the cache.
    #[error("unable to cache oauth token: {0}")]
    CacheWriteFailed(#[source] CacheError),

    /// No authorization code could be read from the terminal.
    #[error("unable to read authorization code: {0}")]
    CodeReadFailed(String),

    /// The authorization code could not be exchanged for a token.
    #[error("unable to retrieve token from web: {0}")]
    TokenExchangeFailed(#[source] ProviderError),

    /// An HTTP client (OAuth or Tasks API) could not be built.
    #[error("unable to create HTTP client: {0}")]
    ClientConstructionFailed(#[source] ProviderError),

    /// Listing the user's task lists failed.
    #[error("unable to retrieve task lists: {0}")]
    TaskListRetrievalFailed(#[source] ProviderError),

    /// The named list did not exist and creating it failed.
    #[error("no {list} task list found and it could not be created: {source}")]
    NoTodoList {
        list: String,
        #[source]
        source: ProviderError,
    },

    /// Listing the tasks of the list failed.
    #[error("unable to retrieve tasks: {0}")]
    TasksRetrievalFailed(#[source] ProviderError),

    /// Inserting the new task failed.
    #[error("could not add task to {list} list: {source}")]
    TaskInsertFailed {
        list: String,
        #[source]
        source: ProviderError,
    },

    /// Writing to the terminal failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigUnreadable(message.into())
    }
}
