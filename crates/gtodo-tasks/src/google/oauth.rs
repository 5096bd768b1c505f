//! OAuth 2.0 authorization code flow for Google APIs.
//!
//! The flow is the installed-application variant where the user opens the
//! authorization URL, approves access, and pastes the resulting code back
//! into the terminal:
//!
//! 1. Generate a PKCE code verifier, its SHA-256 challenge and a state value
//! 2. Build the authorization URL (offline access, so a refresh token is issued)
//! 3. The caller shows the URL and collects the code
//! 4. Exchange the code (with verifier) for access and refresh tokens

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::service::BoxFuture;

use super::config::{GoogleConfig, OAuthCredentials};
use super::tokens::Token;

/// The PKCE code verifier length (in bytes, before base64 encoding).
const CODE_VERIFIER_LENGTH: usize = 32;

/// An authorization URL together with the secrets needed to redeem its code.
#[derive(Debug)]
pub struct AuthorizationRequest {
    /// URL the user opens in a browser.
    pub url: String,
    pkce: PkceFlow,
}

impl AuthorizationRequest {
    pub fn new(url: impl Into<String>, pkce: PkceFlow) -> Self {
        Self {
            url: url.into(),
            pkce,
        }
    }

    /// The PKCE verifier to send with the code exchange.
    pub fn verifier(&self) -> &str {
        &self.pkce.verifier
    }

    /// The state value embedded in the URL.
    pub fn state(&self) -> &str {
        &self.pkce.state
    }
}

/// The OAuth operations the authenticator depends on.
pub trait OAuthFlow: Send + Sync {
    /// Builds a fresh authorization request.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Exchanges an authorization code for a token.
    fn exchange<'a>(
        &'a self,
        code: &'a str,
        request: &'a AuthorizationRequest,
    ) -> BoxFuture<'a, ProviderResult<Token>>;

    /// Obtains a new access token using the token's refresh token.
    fn refresh<'a>(&'a self, token: &'a Token) -> BoxFuture<'a, ProviderResult<Token>>;
}

/// OAuth client for Google APIs.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    scopes: Vec<String>,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client from the backend configuration.
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        Self::with_timeout(config.credentials.clone(), config.scopes.clone(), config.timeout)
    }

    fn with_timeout(
        credentials: OAuthCredentials,
        scopes: Vec<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            credentials,
            scopes,
            http_client,
        })
    }

    /// Posts a form to the token endpoint and parses the response.
    async fn token_request(&self, params: &[(&str, &str)]) -> ProviderResult<TokenResponse> {
        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })
    }
}

impl OAuthFlow for OAuthClient {
    fn authorization_request(&self) -> AuthorizationRequest {
        let pkce = PkceFlow::new();
        let url = pkce.build_auth_url(&self.credentials, &self.scopes);
        debug!("authorization URL: {}", url);
        AuthorizationRequest::new(url, pkce)
    }

    fn exchange<'a>(
        &'a self,
        code: &'a str,
        request: &'a AuthorizationRequest,
    ) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(async move {
            let params = [
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("code_verifier", request.verifier()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ];

            let response = self.token_request(&params).await?;
            info!("obtained tokens from authorization code");
            Ok(response.into_token(None))
        })
    }

    fn refresh<'a>(&'a self, token: &'a Token) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(async move {
            let refresh_token = token
                .refresh_token
                .as_deref()
                .ok_or_else(|| ProviderError::authentication("token has no refresh token"))?;

            let params = [
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ];

            let response = self.token_request(&params).await?;
            info!("refreshed access token");
            Ok(response.into_token(Some(refresh_token)))
        })
    }
}

/// PKCE flow state and utilities.
///
/// Implements RFC 7636 (Proof Key for Code Exchange).
#[derive(Debug)]
pub struct PkceFlow {
    /// The code verifier (high-entropy random string).
    pub verifier: String,
    /// The code challenge (SHA-256 hash of verifier, base64url encoded).
    pub challenge: String,
    /// Random state echoed back by the authorization server.
    pub state: String,
}

impl PkceFlow {
    /// Creates a new PKCE flow with random verifier and state.
    pub fn new() -> Self {
        let verifier = Self::generate_verifier();
        let challenge = Self::compute_challenge(&verifier);
        let state = Self::generate_state();

        Self {
            verifier,
            challenge,
            state,
        }
    }

    fn generate_verifier() -> String {
        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..CODE_VERIFIER_LENGTH).map(|_| rng.random()).collect();
        URL_SAFE_NO_PAD.encode(&bytes)
    }

    fn compute_challenge(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }

    fn generate_state() -> String {
        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..16).map(|_| rng.random()).collect();
        URL_SAFE_NO_PAD.encode(&bytes)
    }

    /// Builds the authorization URL for the given client and scopes.
    pub fn build_auth_url(&self, credentials: &OAuthCredentials, scopes: &[String]) -> String {
        let scope = scopes.join(" ");
        let separator = if credentials.auth_uri.contains('?') { '&' } else { '?' };

        format!(
            "{}{}access_type=offline&client_id={}&code_challenge={}&\
            code_challenge_method=S256&redirect_uri={}&response_type=code&\
            scope={}&state={}",
            credentials.auth_uri,
            separator,
            urlencoding::encode(&credentials.client_id),
            urlencoding::encode(&self.challenge),
            urlencoding::encode(&credentials.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(&self.state),
        )
    }
}

impl Default for PkceFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Converts to a token, keeping `previous_refresh` when the response
    /// carries no refresh token of its own.
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string));
        Token::from_response(
            self.access_token,
            self.token_type,
            refresh_token,
            self.expires_in,
        )
    }
}
