//! Google Tasks backend configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Google's authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Redirect URI for installed applications that paste the code manually.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// OAuth 2.0 client configuration for Google API access.
///
/// Users provide their own client, registered in the Google Cloud Console.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// Redirect URI sent with the authorization and exchange requests.
    pub redirect_uri: String,
    /// Authorization endpoint.
    pub auth_uri: String,
    /// Token endpoint.
    pub token_uri: String,
}

/// Structure of Google's client secret JSON file.
///
/// Supports the Cloud Console format with an `installed` or `web` section,
/// and a flat format with `client_id`/`client_secret` at the root.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecretSection>,
    web: Option<ClientSecretSection>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretSection {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl OAuthCredentials {
    /// Creates credentials using Google's default endpoints and the
    /// out-of-band redirect URI.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: OOB_REDIRECT_URI.to_string(),
            auth_uri: GOOGLE_AUTH_URL.to_string(),
            token_uri: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Loads credentials from a client secret JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "unable to read client secret file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses credentials from a client secret JSON string.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("unable to parse client secret file: {}", e))
        })?;

        if let Some(section) = file.installed.or(file.web) {
            let mut creds = Self::new(section.client_id, section.client_secret);
            if let Some(uri) = section.redirect_uris.into_iter().next() {
                creds.redirect_uri = uri;
            }
            if let Some(uri) = section.auth_uri {
                creds.auth_uri = uri;
            }
            if let Some(uri) = section.token_uri {
                creds.token_uri = uri;
            }
            return Ok(creds);
        }

        if let (Some(client_id), Some(client_secret)) = (file.client_id, file.client_secret) {
            return Ok(Self::new(client_id, client_secret));
        }

        Err(ProviderError::configuration(
            "client secret file must contain an 'installed'/'web' section or 'client_id'/'client_secret' at root level",
        ))
    }

    /// Validates that the credentials appear to be correctly formatted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err("client_id should end with .apps.googleusercontent.com");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        if self.redirect_uri.is_empty() {
            return Err("redirect_uri is required");
        }
        Ok(())
    }
}

/// Configuration for the Google Tasks backend.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client configuration.
    pub credentials: OAuthCredentials,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://www.googleapis.com/auth/tasks"]`.
    pub scopes: Vec<String>,

    /// Request timeout for API and token calls.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Read/write access to Google Tasks.
    pub const TASKS_SCOPE: &'static str = "https://www.googleapis.com/auth/tasks";

    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            scopes: vec![Self::TASKS_SCOPE.to_string()],
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("gtodo/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}
