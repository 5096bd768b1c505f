//! todo CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use gtodo_core::{TracingConfig, init_tracing};
use gtodo_tasks::google::{GoogleConfig, OAuthCredentials, TokenCache};
use tracing::debug;

use gtodo_client::auth::{Authenticator, oauth_client};
use gtodo_client::cli::Cli;
use gtodo_client::commands;
use gtodo_client::config::Settings;
use gtodo_client::error::{ClientError, ClientResult};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let settings = Settings::load(&cli)?;
    debug!("settings: {:?}", settings);

    let credentials = OAuthCredentials::from_file(&settings.credentials_file)
        .map_err(|e| ClientError::config(e.to_string()))?;
    let config = GoogleConfig::new(credentials).with_timeout(settings.timeout);
    config.validate().map_err(ClientError::config)?;

    let cache = match &settings.token_path {
        Some(path) => TokenCache::new(path),
        None => TokenCache::resolve_default().map_err(ClientError::CacheDirUnavailable)?,
    };

    let oauth = oauth_client(&config)?;
    let authenticator = Authenticator::new(oauth, cache).with_reauth(settings.reauth);
    let client = authenticator.get_client(&config).await?;

    let title = cli.title();
    let mut out = io::stdout().lock();
    commands::execute(&client, &settings.list_name, title.as_deref(), &mut out).await
}
