//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// todo - Google Tasks from the terminal
///
/// Without arguments, prints the incomplete tasks of the list. With
/// arguments, joins them with spaces and adds the result as a new task.
#[derive(Debug, Parser)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "GTODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the OAuth client secret JSON downloaded from Google Cloud Console
    #[arg(long, env = "GTODO_CREDENTIALS_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Path to the cached OAuth token
    #[arg(long, env = "GTODO_TOKEN_PATH")]
    pub token_path: Option<PathBuf>,

    /// Name of the task list to use
    #[arg(long, short, env = "GTODO_LIST")]
    pub list: Option<String>,

    /// Ignore the cached token and authorize again
    #[arg(long)]
    pub reauth: bool,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Title of the task to add
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub title: Vec<String>,
}

impl Cli {
    /// Returns the task title, or `None` when tasks should be listed.
    pub fn title(&self) -> Option<String> {
        let title = self.title.join(" ");
        if title.is_empty() { None } else { Some(title) }
    }
}
