//! Obtaining an authorized Tasks client.
//!
//! The cached token is used when present and valid. An expired token is
//! refreshed when it carries a refresh token. Otherwise the user is sent
//! through the authorization code flow once and the result is cached.

use std::io::{self, BufRead, Write};

use gtodo_tasks::google::{
    GoogleConfig, GoogleTasksClient, OAuthClient, OAuthFlow, Token, TokenCache,
};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Builds the OAuth client for the token endpoint.
pub fn oauth_client(config: &GoogleConfig) -> ClientResult<OAuthClient> {
    OAuthClient::new(config).map_err(ClientError::ClientConstructionFailed)
}

/// Resolves a token from the cache or the user.
#[derive(Debug)]
pub struct Authenticator<O> {
    oauth: O,
    cache: TokenCache,
    reauth: bool,
}

impl<O: OAuthFlow> Authenticator<O> {
    pub fn new(oauth: O, cache: TokenCache) -> Self {
        Self {
            oauth,
            cache,
            reauth: false,
        }
    }

    /// Skip the cached token and always ask the user.
    pub fn with_reauth(mut self, reauth: bool) -> Self {
        self.reauth = reauth;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Builds a Tasks client authorized with the resolved token.
    pub async fn get_client(&self, config: &GoogleConfig) -> ClientResult<GoogleTasksClient> {
        let token = self.get_token().await?;
        GoogleTasksClient::new(token, config).map_err(ClientError::ClientConstructionFailed)
    }

    /// Resolves a token, prompting on the terminal if needed.
    pub async fn get_token(&self) -> ClientResult<Token> {
        let mut input = io::stdin().lock();
        let mut output = io::stdout().lock();
        self.get_token_with(&mut input, &mut output).await
    }

    /// Resolves a token, prompting through the given reader and writer.
    pub async fn get_token_with<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> ClientResult<Token> {
        if self.reauth {
            debug!("reauthorization requested, ignoring cached token");
        } else if let Some(token) = self.cached_token().await? {
            return Ok(token);
        }

        let token = self.request_token_interactively(input, output).await?;
        writeln!(output, "Saving credential file to: {}", self.cache.path().display())?;
        self.cache.save(&token).map_err(ClientError::CacheWriteFailed)?;
        Ok(token)
    }

    /// Returns a usable cached token, refreshing it if it has expired.
    ///
    /// `None` means the interactive flow is needed.
    async fn cached_token(&self) -> ClientResult<Option<Token>> {
        let token = match self.cache.load() {
            Ok(token) => token,
            Err(e) if e.is_miss() => {
                debug!("no usable cached token: {}", e);
                return Ok(None);
            }
            Err(e) => {
                warn!("ignoring token cache: {}", e);
                return Ok(None);
            }
        };

        if !token.is_expired() {
            debug!("using cached token from {}", self.cache.path().display());
            return Ok(Some(token));
        }

        if !token.can_refresh() {
            debug!("cached token expired and has no refresh token");
            return Ok(None);
        }

        match self.oauth.refresh(&token).await {
            Ok(refreshed) => {
                info!("cached token refreshed");
                self.cache
                    .save(&refreshed)
                    .map_err(ClientError::CacheWriteFailed)?;
                Ok(Some(refreshed))
            }
            Err(e) => {
                warn!("token refresh failed, authorizing again: {}", e);
                Ok(None)
            }
        }
    }

    /// Shows the authorization URL, reads the code the user pastes back and
    /// exchanges it for a token.
    pub async fn request_token_interactively<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> ClientResult<Token> {
        let request = self.oauth.authorization_request();
        writeln!(
            output,
            "Go to the following link in your browser then type the authorization code: \n{}",
            request.url
        )?;
        output.flush()?;

        let code = read_code(input)?;
        debug!("exchanging authorization code");
        self.oauth
            .exchange(&code, &request)
            .await
            .map_err(ClientError::TokenExchangeFailed)
    }
}

/// Reads the first whitespace-delimited word, skipping blank lines.
fn read_code<R: BufRead>(input: &mut R) -> ClientResult<String> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| ClientError::CodeReadFailed(e.to_string()))?;
        if read == 0 {
            return Err(ClientError::CodeReadFailed(
                "no authorization code entered".to_string(),
            ));
        }
        if let Some(code) = line.split_whitespace().next() {
            return Ok(code.to_string());
        }
    }
}
