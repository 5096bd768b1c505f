//! OAuth token and the on-disk token cache.
//!
//! The cache is a single JSON file, by default
//! `~/.credentials/gtodo-tasks.json`. Any failure to read it is a cache miss;
//! failing to write it is reported to the caller.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Directory under the home directory holding cached credentials.
const CACHE_DIR_NAME: &str = ".credentials";

/// File name of the token cache, before URL escaping.
const CACHE_FILE_NAME: &str = "gtodo-tasks.json";

/// A token is treated as expired this long before its actual expiry.
const EXPIRY_DELTA_SECS: i64 = 10;

/// An OAuth credential.
///
/// Field order is the serialization order, so a token written by
/// [`TokenCache::save`] and loaded back serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The access token for API requests.
    pub access_token: String,

    /// Token type, normally `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The refresh token for obtaining new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires. `None` means it does not expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Creates a bearer token without refresh token or expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Builds a token from a token endpoint response.
    ///
    /// `expires_in_secs` is relative to now.
    pub fn from_response(
        access_token: impl Into<String>,
        token_type: Option<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.unwrap_or_else(default_token_type),
            refresh_token,
            expiry: expires_in_secs.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }

    /// Builder method to set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Builder method to set the expiry.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        self.expiry
            .is_some_and(|expiry| Utc::now() + Duration::seconds(EXPIRY_DELTA_SECS) >= expiry)
    }

    /// Returns true if the token can be refreshed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Errors from the token cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The current user's home directory could not be determined.
    #[error("unable to determine home directory")]
    NoHomeDir,

    /// The cache directory could not be created.
    #[error("unable to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No cache file exists.
    #[error("no cached token at {0}")]
    NotFound(PathBuf),

    /// The cache file exists but could not be read.
    #[error("unable to read cached token {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file does not contain a valid token.
    #[error("unable to parse cached token {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The token could not be encoded.
    #[error("unable to encode token: {0}")]
    Encode(#[source] serde_json::Error),

    /// The cache file could not be written.
    #[error("unable to write cached token {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    /// Returns true for errors that only mean "no usable cached token".
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Read { .. } | Self::Parse { .. }
        )
    }
}

/// Resolves the default cache file path, creating the cache directory.
///
/// The directory is created owner-only (`0700`) on unix. The file name is
/// URL-escaped.
pub fn resolve_cache_path() -> Result<PathBuf, CacheError> {
    let home = dirs::home_dir().ok_or(CacheError::NoHomeDir)?;
    let dir = home.join(CACHE_DIR_NAME);
    create_private_dir(&dir)?;
    Ok(dir.join(urlencoding::encode(CACHE_FILE_NAME).as_ref()))
}

fn create_private_dir(dir: &Path) -> Result<(), CacheError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|source| CacheError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Creates a cache at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a cache at the default per-user location.
    pub fn resolve_default() -> Result<Self, CacheError> {
        resolve_cache_path().map(Self::new)
    }

    /// Returns the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached token.
    ///
    /// Every error returned here satisfies [`CacheError::is_miss`].
    pub fn load(&self) -> Result<Token, CacheError> {
        let content = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CacheError::NotFound(self.path.clone())
            } else {
                CacheError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let token: Token = serde_json::from_str(&content).map_err(|source| CacheError::Parse {
            path: self.path.clone(),
            source,
        })?;

        debug!("loaded cached token from {:?}", self.path);
        Ok(token)
    }

    /// Writes the token, replacing any previous content.
    ///
    /// The file is written to a temporary sibling created with mode `0600`
    /// on unix and renamed into place. The temporary file never outlives a
    /// failed save.
    pub fn save(&self, token: &Token) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| CacheError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(token).map_err(CacheError::Encode)?;

        let temp_path = self.temp_path();
        let result = write_private(&temp_path, content.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(source) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Write {
                path: self.path.clone(),
                source,
            });
        }

        info!("saved token to {:?}", self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

/// Creates or truncates `path` readable by the owner only, then writes
/// `content` to it.
fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        // An existing file keeps its old mode on open.
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}
