//! Client configuration.
//!
//! Optional settings live in `~/.config/gtodo/config.toml`. Command-line
//! flags and environment variables take precedence over the file, and the
//! file over the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gtodo_core::ListName;
use gtodo_tasks::google::GoogleConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Default name of the client secret file, looked up next to the executable.
pub const DEFAULT_CREDENTIALS_FILE: &str = "client_secret.json";

/// Configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name of the task list to manage.
    pub list_name: Option<String>,

    /// Path to the OAuth client secret JSON.
    pub credentials_file: Option<PathBuf>,

    /// Path to the cached token.
    pub token_path: Option<PathBuf>,

    /// HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gtodo")
    }
}

/// Effective settings for one run, after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub list_name: ListName,
    pub credentials_file: PathBuf,
    /// `None` means the default `~/.credentials` location.
    pub token_path: Option<PathBuf>,
    pub timeout: Duration,
    pub reauth: bool,
}

impl Settings {
    /// Loads the config file named on the command line (or the default one)
    /// and merges it with the flags.
    pub fn load(cli: &Cli) -> ClientResult<Self> {
        let config = match &cli.config {
            Some(path) => ClientConfig::load_from(path),
            None => ClientConfig::load(),
        }
        .map_err(ClientError::ConfigUnreadable)?;

        Ok(Self::resolve(cli, config))
    }

    /// Merges flags over the config file.
    pub fn resolve(cli: &Cli, config: ClientConfig) -> Self {
        let list_name = cli
            .list
            .clone()
            .or(config.list_name)
            .filter(|name| !name.is_empty())
            .map(ListName::new)
            .unwrap_or_default();

        let credentials_file = cli
            .credentials_file
            .clone()
            .or(config.credentials_file)
            .unwrap_or_else(default_credentials_file);

        let timeout = config
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(GoogleConfig::DEFAULT_TIMEOUT_SECS));

        Self {
            list_name,
            credentials_file,
            token_path: cli.token_path.clone().or(config.token_path),
            timeout,
            reauth: cli.reauth,
        }
    }
}

/// `client_secret.json` in the directory of the running executable, falling
/// back to the working directory.
fn default_credentials_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CREDENTIALS_FILE)
}
