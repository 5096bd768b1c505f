//! Google Tasks backend.
//!
//! # Features
//!
//! - OAuth 2.0 authorization code flow with PKCE, code pasted by the user
//! - Token cache in `~/.credentials` with owner-only permissions
//! - Token refresh through the refresh token
//! - Task list and task listing across pages, task list and task insertion
//!
//! # Authentication Flow
//!
//! 1. User provides their own OAuth client secret file (required by Google)
//! 2. [`OAuthClient`] builds an authorization URL with a PKCE challenge
//! 3. User opens the URL, grants access and copies the authorization code
//! 4. The code is exchanged for access and refresh tokens
//! 5. Tokens are written to the [`TokenCache`] for later runs

mod client;
mod config;
mod oauth;
mod tokens;

pub use client::{GoogleTasksClient, TASKS_API_BASE};
pub use config::{GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GoogleConfig, OOB_REDIRECT_URI, OAuthCredentials};
pub use oauth::{AuthorizationRequest, OAuthClient, OAuthFlow, PkceFlow};
pub use tokens::{CacheError, Token, TokenCache, resolve_cache_path};
